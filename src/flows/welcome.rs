//! Text shown at the top of an empty chat.

use crate::navigation::Route;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    PolicyExpenseChat,
    PolicyAdmins,
    PolicyAnnounce,
    Domain,
    PolicyRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IouType {
    Send,
    Request,
    Split,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub report_id: String,
    pub report_name: String,
    pub chat_type: Option<ChatType>,
    pub owner_account_id: Option<u64>,
    pub policy_name: Option<String>,
    pub participant_account_ids: Vec<u64>,
    pub is_archived: bool,
    pub admins_only_posting: bool,
    pub money_request_options: Vec<IouType>,
}

impl Report {
    pub fn is_policy_expense_chat(&self) -> bool {
        self.chat_type == Some(ChatType::PolicyExpenseChat)
    }

    pub fn is_chat_room(&self) -> bool {
        matches!(
            self.chat_type,
            Some(
                ChatType::PolicyAdmins
                    | ChatType::PolicyAnnounce
                    | ChatType::Domain
                    | ChatType::PolicyRoom
            )
        )
    }

    fn policy_name(&self) -> &str {
        self.policy_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Unavailable workspace")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRole {
    Admin,
    Auditor,
    #[default]
    User,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub name: String,
    pub role: PolicyRole,
}

impl Policy {
    pub fn is_admin(&self) -> bool {
        self.role == PolicyRole::Admin
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalDetails {
    pub display_name: String,
    pub first_name: String,
    pub login: String,
    pub pronouns: String,
    pub is_optimistic: bool,
}

pub type PersonalDetailsList = IndexMap<u64, PersonalDetails>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub strong: bool,
    pub link: Option<Route>,
}

impl Segment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: false,
            link: None,
        }
    }

    fn strong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: true,
            link: None,
        }
    }

    fn linked(mut self, route: Route) -> Self {
        self.link = Some(route);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeMessage {
    pub hero: String,
    pub body: Vec<Segment>,
}

impl WelcomeMessage {
    pub fn body_text(&self) -> String {
        self.body.iter().map(|segment| segment.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RoomWelcome {
    phrase1: String,
    phrase2: Option<String>,
    show_report_name: bool,
}

fn room_welcome(report: &Report, is_policy_admin: bool) -> RoomWelcome {
    let workspace = report.policy_name();
    let (phrase1, phrase2, show_report_name) = if report.is_archived {
        (
            "You missed the party in ".to_string(),
            Some(", there's nothing to see here.".to_string()),
            true,
        )
    } else if report.chat_type == Some(ChatType::Domain) {
        (
            format!(
                "Collaboration with everyone at {} starts here! 🎉\nUse ",
                report.report_name
            ),
            Some(" to chat with colleagues, share tips, and ask questions.".to_string()),
            true,
        )
    } else if report.chat_type == Some(ChatType::PolicyAdmins) {
        (
            format!("Collaboration among {workspace} admins starts here! 🎉\nUse "),
            Some(" to chat about topics such as workspace configurations and more.".to_string()),
            true,
        )
    } else if report.admins_only_posting && !is_policy_admin {
        (
            "Only admins can send messages in this room.".to_string(),
            None,
            false,
        )
    } else if report.chat_type == Some(ChatType::PolicyAnnounce) {
        (
            format!("Collaboration between all {workspace} members starts here! 🎉\nUse "),
            Some(format!(" to chat about anything {workspace} related.")),
            true,
        )
    } else {
        (
            "Collaboration starts here! 🎉\nUse this space to chat about anything ".to_string(),
            Some(" related.".to_string()),
            true,
        )
    };

    RoomWelcome {
        phrase1,
        phrase2,
        show_report_name,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Participant {
    account_id: u64,
    display_name: String,
    pronouns: String,
    is_optimistic: bool,
}

/// Short first names are used when there is more than one participant.
fn participants(report: &Report, details: &PersonalDetailsList) -> Vec<Participant> {
    let multiple = report.participant_account_ids.len() > 1;
    report
        .participant_account_ids
        .iter()
        .filter_map(|id| details.get(id).map(|detail| (*id, detail)))
        .map(|(account_id, detail)| {
            let full = if detail.display_name.is_empty() {
                detail.login.clone()
            } else {
                detail.display_name.clone()
            };
            let display_name = if multiple && !detail.first_name.is_empty() {
                detail.first_name.clone()
            } else {
                full
            };
            Participant {
                account_id,
                display_name,
                pronouns: detail.pronouns.clone(),
                is_optimistic: detail.is_optimistic,
            }
        })
        .collect()
}

fn owner_name(report: &Report, details: &PersonalDetailsList) -> String {
    report
        .owner_account_id
        .and_then(|id| details.get(&id))
        .map(|detail| {
            if detail.display_name.is_empty() {
                detail.login.clone()
            } else {
                detail.display_name.clone()
            }
        })
        .unwrap_or_default()
}

pub fn compose_welcome(
    report: &Report,
    policy: &Policy,
    personal_details: &PersonalDetailsList,
) -> WelcomeMessage {
    let is_chat_room = report.is_chat_room();
    let is_policy_expense_chat = report.is_policy_expense_chat();

    let hero = if is_chat_room {
        format!("Welcome to {}!", report.report_name)
    } else {
        "Say hello!".to_string()
    };

    let mut body = Vec::new();
    if is_policy_expense_chat {
        body.push(Segment::plain("Collaboration between "));
        body.push(Segment::strong(owner_name(report, personal_details)));
        body.push(Segment::plain(" and "));
        body.push(Segment::strong(report.policy_name()));
        body.push(Segment::plain(" starts here! 🎉"));
    } else if is_chat_room {
        let room = room_welcome(report, policy.is_admin());
        body.push(Segment::plain(room.phrase1));
        if room.show_report_name {
            body.push(
                Segment::strong(report.report_name.clone()).linked(Route::ReportDetails {
                    report_id: report.report_id.clone(),
                }),
            );
        }
        if let Some(phrase2) = room.phrase2 {
            body.push(Segment::plain(phrase2));
        }
    } else {
        body.push(Segment::plain("This is the beginning of your chat with "));
        let people = participants(report, personal_details);
        let count = people.len();
        for (index, person) in people.into_iter().enumerate() {
            let name = Segment::strong(person.display_name);
            body.push(if person.is_optimistic {
                name
            } else {
                name.linked(Route::Profile {
                    account_id: person.account_id,
                })
            });
            if !person.pronouns.is_empty() {
                body.push(Segment::plain(format!(" ({})", person.pronouns)));
            }
            if index + 1 == count {
                body.push(Segment::plain("."));
            } else if index + 2 == count {
                body.push(Segment::plain(" and "));
            } else {
                body.push(Segment::plain(", "));
            }
        }
    }

    if report
        .money_request_options
        .iter()
        .any(|option| matches!(option, IouType::Send | IouType::Request))
    {
        body.push(Segment::plain(
            "\n\nYou can also use the + button to send or request money!",
        ));
    }

    WelcomeMessage { hero, body }
}
