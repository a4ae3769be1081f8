pub mod interval_id;
pub mod note_id;
pub mod round;
pub mod sequence_recall;

#[cfg(test)]
pub(crate) mod testing;

pub use interval_id::{IntervalTraining, IntervalVerdict};
pub use note_id::{NoteIdentification, NoteVerdict};
pub use round::RoundPhase;
pub use sequence_recall::{RecallInput, SequenceRecall, MAX_SEQUENCE_LEN, MIN_SEQUENCE_LEN};
