use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::state::{ExitReason, FormState};

pub struct Reducer;

impl Reducer {
    pub fn reduce(state: &mut FormState, command: Command) -> Vec<Effect> {
        match command {
            Command::Exit => {
                state.request_exit(ExitReason::Quit);
                vec![Effect::RequestRender]
            }
            Command::Back => match state.step_back() {
                Some(nav) => vec![Effect::Navigate(nav)],
                None => vec![Effect::RequestRender],
            },
            Command::Submit => {
                state.submit_step();
                vec![Effect::RequestRender]
            }
            Command::NextFocus => {
                state.focus_next();
                vec![Effect::RequestRender]
            }
            Command::PrevFocus => {
                state.focus_prev();
                vec![Effect::RequestRender]
            }
            Command::JumpTo(index) => render_if(state.jump_to(index)),
            Command::InputKey(key) => render_if(state.dispatch_key_to_focused(key)),
            Command::TextAction(action) => {
                render_if(state.dispatch_text_action_to_focused(action))
            }
            Command::Tick => render_if(state.drain_completions()),
            Command::Noop => Vec::new(),
        }
    }
}

fn render_if(changed: bool) -> Vec<Effect> {
    if changed {
        vec![Effect::RequestRender]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Reducer;
    use crate::core::error::SubmitError;
    use crate::core::value::Draft;
    use crate::flows::personal_info::{PersonalInfoSubmission, SessionOptions, Submitter};
    use crate::navigation::{NavCommand, Route};
    use crate::runtime::command::Command;
    use crate::runtime::effect::Effect;
    use crate::runtime::state::{ExitReason, FormState};
    use crate::store::MemoryStore;
    use crate::terminal::{KeyCode, KeyEvent};
    use chrono::NaiveDate;

    struct Discard;

    impl Submitter for Discard {
        fn submit(&mut self, _: &PersonalInfoSubmission) -> Result<(), SubmitError> {
            Ok(())
        }
    }

    fn state() -> FormState {
        FormState::new(
            Box::new(MemoryStore::from_draft(Draft::new())),
            Box::new(Discard),
            1,
            NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
            SessionOptions::default(),
        )
        .expect("state")
    }

    #[test]
    fn back_on_first_step_navigates_home() {
        let mut state = state();
        assert_eq!(
            Reducer::reduce(&mut state, Command::Back),
            vec![Effect::Navigate(NavCommand::GoBack(Some(Route::Home)))]
        );
    }

    #[test]
    fn typing_requests_render_and_idle_keys_do_not() {
        let mut state = state();
        let typed = Reducer::reduce(
            &mut state,
            Command::InputKey(KeyEvent::plain(KeyCode::Char('A'))),
        );
        assert_eq!(typed, vec![Effect::RequestRender]);
        assert!(Reducer::reduce(&mut state, Command::Tick).is_empty());
        assert!(Reducer::reduce(&mut state, Command::JumpTo(3)).is_empty());
    }

    #[test]
    fn exit_marks_quit() {
        let mut state = state();
        Reducer::reduce(&mut state, Command::Exit);
        assert_eq!(state.exit_reason(), Some(&ExitReason::Quit));
    }
}
