pub mod onboarding;
pub mod personal_info;
pub mod welcome;
