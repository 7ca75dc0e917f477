use crate::core::error::SequencerError;
use crate::core::sequencer::{Advance, Retreat, StepSequencer};
use crate::navigation::{NavCommand, OnboardingScreen, Route};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Track,
    Submit,
    ManageTeam,
    SmallBusiness,
}

impl Purpose {
    pub const ALL: [Self; 4] = [Self::Track, Self::Submit, Self::ManageTeam, Self::SmallBusiness];

    pub fn key(self) -> &'static str {
        match self {
            Self::Track => "purposeForExpensify.track",
            Self::Submit => "purposeForExpensify.submit",
            Self::ManageTeam => "purposeForExpensify.VSB",
            Self::SmallBusiness => "purposeForExpensify.SMB",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Track => "Track and budget expenses",
            Self::Submit => "Get paid back by my employer",
            Self::ManageTeam => "Manage my team's expenses",
            Self::SmallBusiness => "Run my small business",
        }
    }

    pub fn icon(self) -> Icon {
        match self {
            Self::Track | Self::Submit => Icon::ReceiptSearch,
            Self::ManageTeam => Icon::MoneyBag,
            Self::SmallBusiness => Icon::Briefcase,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    ReceiptSearch,
    MoneyBag,
    Briefcase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub title: &'static str,
    pub icon: Icon,
    pub shows_right_arrow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalLayout {
    BottomDocked,
    RightDocked,
}

/// "What do you want to do today?" menu. Only the first selection counts.
#[derive(Debug, Clone)]
pub struct PurposeModal {
    open: bool,
    layout: ModalLayout,
    selected: Option<Purpose>,
}

impl PurposeModal {
    pub const TITLE: &'static str = "Welcome to Expensify";
    pub const SUBTITLE: &'static str = "What do you want to do today?";

    pub fn new(small_screen: bool) -> Self {
        Self {
            open: true,
            layout: if small_screen {
                ModalLayout::BottomDocked
            } else {
                ModalLayout::RightDocked
            },
            selected: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn layout(&self) -> ModalLayout {
        self.layout
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        Purpose::ALL
            .iter()
            .map(|purpose| MenuItem {
                key: purpose.key(),
                title: purpose.title(),
                icon: purpose.icon(),
                shows_right_arrow: true,
            })
            .collect()
    }

    pub fn select(&mut self, index: usize) -> Option<Purpose> {
        if !self.open || self.selected.is_some() {
            return None;
        }
        let purpose = Purpose::ALL.get(index).copied()?;
        self.selected = Some(purpose);
        Some(purpose)
    }

    /// Shows the menu again with no choice made, for when the user comes
    /// back to the purpose screen.
    pub fn reopen(&mut self) {
        self.open = true;
        self.selected = None;
    }

    pub fn selected(&self) -> Option<Purpose> {
        self.selected
    }
}

pub enum OpenOutcome {
    Opened(OnboardingFlow),
    /// Guided setup already done: leave and land in the concierge chat.
    Redirect(Vec<NavCommand>),
}

pub struct OnboardingFlow {
    sequencer: StepSequencer<OnboardingScreen>,
    purpose: Option<Purpose>,
}

impl OnboardingFlow {
    /// `has_completed_guided_setup` comes from the user's stored onboarding
    /// state; a missing value counts as completed.
    pub fn open(
        has_completed_guided_setup: Option<bool>,
        on_complete: impl FnMut() + Send + 'static,
    ) -> Result<OpenOutcome, SequencerError> {
        if has_completed_guided_setup.unwrap_or(true) {
            debug!("guided setup already completed, redirecting");
            return Ok(OpenOutcome::Redirect(vec![
                NavCommand::GoBack(None),
                NavCommand::Navigate(Route::ConciergeChat),
            ]));
        }

        let sequencer = StepSequencer::new(OnboardingScreen::ALL.to_vec(), 0, on_complete)?;
        Ok(OpenOutcome::Opened(Self {
            sequencer,
            purpose: None,
        }))
    }

    pub fn screen(&self) -> OnboardingScreen {
        *self.sequencer.current_step()
    }

    pub fn route(&self) -> Route {
        Route::Onboarding(self.screen())
    }

    pub fn purpose(&self) -> Option<Purpose> {
        self.purpose
    }

    pub fn choose_purpose(&mut self, purpose: Purpose) -> Advance {
        info!(purpose = purpose.key(), "onboarding purpose chosen");
        self.purpose = Some(purpose);
        self.sequencer.advance()
    }

    pub fn next(&mut self) -> Advance {
        self.sequencer.advance()
    }

    /// `Some` when backing out of the first screen.
    pub fn back(&mut self) -> Option<NavCommand> {
        match self.sequencer.retreat() {
            Retreat::Moved(_) => None,
            Retreat::AtBoundary => Some(NavCommand::GoBack(None)),
        }
    }
}
