use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    ConciergeChat,
    ReportDetails { report_id: String },
    Profile { account_id: u64 },
    Onboarding(OnboardingScreen),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingScreen {
    Purpose,
    PersonalDetails,
    Work,
}

impl OnboardingScreen {
    pub const ALL: [Self; 3] = [Self::Purpose, Self::PersonalDetails, Self::Work];

    pub fn name(self) -> &'static str {
        match self {
            Self::Purpose => "Onboarding_Purpose",
            Self::PersonalDetails => "Onboarding_Personal_Details",
            Self::Work => "Onboarding_Work",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::ConciergeChat => f.write_str("concierge"),
            Self::ReportDetails { report_id } => write!(f, "r/{report_id}/details"),
            Self::Profile { account_id } => write!(f, "a/{account_id}"),
            Self::Onboarding(OnboardingScreen::Purpose) => f.write_str("onboarding/purpose"),
            Self::Onboarding(OnboardingScreen::PersonalDetails) => {
                f.write_str("onboarding/personal-details")
            }
            Self::Onboarding(OnboardingScreen::Work) => f.write_str("onboarding/work"),
        }
    }
}

/// Navigation requested by a flow. The host owns the actual stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    Navigate(Route),
    /// Pop the current screen, falling back to the given route when there is
    /// nothing to pop.
    GoBack(Option<Route>),
}
