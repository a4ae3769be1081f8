/// Where a game round currently sits. Every game cycles through these
/// in order; `submit` is only legal in `PromptPlayed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundPhase {
    #[default]
    AwaitingPrompt,
    PromptPlayed,
    Evaluated,
}
