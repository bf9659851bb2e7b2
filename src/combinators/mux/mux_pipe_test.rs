use super::*;
use crate::error::PipeError;
use crate::pipe::{IterPipe, Pipe, PipeExt, TryIterPipe};

#[test]
fn test_mux_round_robin_skips_finished_sources() {
  let pipe = MuxPipe::new(vec![
    IterPipe::new(vec!["a1", "a2", "a3"]),
    IterPipe::new(vec!["b1"]),
    IterPipe::new(vec!["c1", "c2"]),
  ]);
  assert_eq!(
    pipe.collect_all().unwrap(),
    vec!["a1", "b1", "c1", "a2", "c2", "a3"]
  );
}

#[test]
fn test_mux_no_sources_is_empty() {
  let mut pipe = MuxPipe::new(Vec::<IterPipe<std::vec::IntoIter<u8>>>::new());
  assert_eq!(pipe.active_sources(), 0);
  assert_eq!(pipe.pull().unwrap(), None);
}

#[test]
fn test_mux_tracks_active_sources() {
  let mut pipe = MuxPipe::new(vec![IterPipe::new(vec![1, 2]), IterPipe::new(vec![])]);
  assert_eq!(pipe.active_sources(), 2);
  assert_eq!(pipe.pull().unwrap(), Some(1));
  assert_eq!(pipe.pull().unwrap(), Some(2));
  assert_eq!(pipe.active_sources(), 1);
  assert_eq!(pipe.pull().unwrap(), None);
  assert_eq!(pipe.active_sources(), 0);
  assert_eq!(pipe.pull().unwrap(), None);
}

#[test]
fn test_mux_length_is_sum_when_known() {
  let pipe = MuxPipe::new(vec![IterPipe::sized(0..3), IterPipe::sized(0..1)]);
  assert_eq!(pipe.length(), Some(4));

  let pipe = MuxPipe::new(vec![IterPipe::sized(0..3), IterPipe::new(0..1)]);
  assert_eq!(pipe.length(), None);
}

#[test]
fn test_mux_propagates_source_error() {
  #[derive(Debug)]
  struct Broken;
  impl std::fmt::Display for Broken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "broken")
    }
  }
  impl std::error::Error for Broken {}

  let mut pipe = MuxPipe::new(vec![
    TryIterPipe::new(vec![Ok(1), Ok(3)]),
    TryIterPipe::new(vec![Err(Broken)]),
  ]);
  assert_eq!(pipe.pull().unwrap(), Some(1));
  assert!(matches!(pipe.pull(), Err(PipeError::Source(_))));
}
