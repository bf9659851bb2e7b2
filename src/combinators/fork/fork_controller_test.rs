//! Tests for the fork controller: broadcast order, buffer bookkeeping,
//! overflow and end-of-stream handling.

use super::*;
use crate::combinators::child::Router;
use crate::config::FanOutConfig;
use crate::error::PipeError;
use crate::pipe::{IterPipe, Pipe, PipeExt, TryIterPipe};

#[test]
fn test_fork_every_child_sees_every_value() {
  let children = fork(IterPipe::new(0..5), 3, 10).unwrap();
  assert_eq!(children.len(), 3);

  for child in children {
    assert_eq!(child.collect_all().unwrap(), vec![0, 1, 2, 3, 4]);
  }
}

#[test]
fn test_fork_interleaved_pulls() {
  let mut children = fork(IterPipe::new(vec!['a', 'b', 'c']), 2, 10).unwrap();
  let (left, right) = children.split_at_mut(1);
  let (a, b) = (&mut left[0], &mut right[0]);

  assert_eq!(a.pull().unwrap(), Some('a'));
  assert_eq!(a.pull().unwrap(), Some('b'));
  assert_eq!(b.pull().unwrap(), Some('a'));
  assert_eq!(b.pull().unwrap(), Some('b'));
  assert_eq!(b.pull().unwrap(), Some('c'));
  assert_eq!(a.pull().unwrap(), Some('c'));
  assert_eq!(a.pull().unwrap(), None);
  assert_eq!(b.pull().unwrap(), None);
}

#[test]
fn test_fork_releases_buffer_as_slowest_advances() {
  let mut children = fork(IterPipe::new(0..4), 2, 10).unwrap();

  for expected in 0..3 {
    assert_eq!(children[0].pull().unwrap(), Some(expected));
  }
  assert_eq!(children[0].controller().buffered_len().unwrap(), 3);

  assert_eq!(children[1].pull().unwrap(), Some(0));
  assert_eq!(children[0].controller().buffered_len().unwrap(), 2);
  assert_eq!(children[1].pull().unwrap(), Some(1));
  assert_eq!(children[1].pull().unwrap(), Some(2));
  assert_eq!(children[0].controller().buffered_len().unwrap(), 0);
}

#[test]
fn test_fork_single_instance_never_buffers() {
  let mut children = fork(IterPipe::new(0..100), 1, 1).unwrap();
  let child = children.pop().unwrap();
  assert_eq!(child.controller().buffered_len().unwrap(), 0);
  assert_eq!(child.collect_all().unwrap(), (0..100).collect::<Vec<_>>());
}

#[test]
fn test_fork_overflow_at_capacity_plus_one() {
  let mut children = fork(IterPipe::new(0..10), 2, 3).unwrap();

  for expected in 0..3 {
    assert_eq!(children[0].pull().unwrap(), Some(expected));
  }
  let err = children[0].pull().unwrap_err();
  assert!(matches!(
    err,
    PipeError::BufferOverflow {
      combinator: "fork",
      capacity: 3
    }
  ));
  assert!(err.is_fatal());
}

#[test]
fn test_fork_overflow_terminates_whole_group() {
  let mut children = fork(IterPipe::new(0..10), 2, 1).unwrap();
  children[0].pull().unwrap();
  assert!(children[0].pull().is_err());

  for child in &mut children {
    match child.pull() {
      Err(PipeError::GroupTerminated { combinator, cause }) => {
        assert_eq!(combinator, "fork");
        assert!(matches!(*cause, PipeError::BufferOverflow { .. }));
      }
      other => panic!("expected GroupTerminated, got {:?}", other),
    }
  }
}

#[test]
fn test_fork_exact_capacity_does_not_overflow() {
  let mut children = fork(IterPipe::new(0..3), 2, 3).unwrap();
  let first: Vec<i32> = std::iter::from_fn(|| children[0].pull().unwrap()).collect();
  assert_eq!(first, vec![0, 1, 2]);

  let second = children.pop().unwrap().collect_all().unwrap();
  assert_eq!(second, vec![0, 1, 2]);
}

#[test]
fn test_fork_pull_for_unknown_child_leaves_group_usable() {
  let mut children = fork(IterPipe::new(0..3), 2, 4).unwrap();
  assert!(matches!(
    children[0].controller().pull_for(5),
    Err(PipeError::InstanceOutOfRange {
      instance_id: 5,
      num_instances: 2
    })
  ));
  assert_eq!(children[0].pull().unwrap(), Some(0));
  assert_eq!(children[1].pull().unwrap(), Some(0));
}

#[test]
fn test_fork_end_does_not_stop_siblings() {
  let mut children = fork(IterPipe::new(vec![1, 2]), 3, 5).unwrap();
  assert_eq!(children[2].pull().unwrap(), Some(1));
  assert_eq!(children[2].pull().unwrap(), Some(2));
  assert_eq!(children[2].pull().unwrap(), None);
  assert_eq!(children[2].pull().unwrap(), None);

  assert_eq!(children[0].pull().unwrap(), Some(1));
  assert_eq!(children[1].pull().unwrap(), Some(1));
  assert_eq!(children[1].pull().unwrap(), Some(2));
  assert_eq!(children[1].pull().unwrap(), None);
  assert_eq!(children[0].pull().unwrap(), Some(2));
  assert_eq!(children[0].pull().unwrap(), None);
}

#[test]
fn test_fork_abandoned_child_keeps_others_bounded() {
  let mut children = fork(IterPipe::new(0..10), 2, 4).unwrap();
  let abandoned = children.remove(1);
  drop(abandoned);

  // The dropped child still holds its cursor, so the survivor is capped.
  let survivor = &mut children[0];
  for expected in 0..4 {
    assert_eq!(survivor.pull().unwrap(), Some(expected));
  }
  assert!(matches!(
    survivor.pull(),
    Err(PipeError::BufferOverflow { .. })
  ));
}

#[test]
fn test_fork_empty_source() {
  let children = fork(IterPipe::new(Vec::<u8>::new()), 2, 1).unwrap();
  for child in children {
    assert!(child.collect_all().unwrap().is_empty());
  }
}

#[test]
fn test_fork_reports_upstream_length() {
  let children = fork(IterPipe::sized(vec![1, 2, 3]), 2, 4).unwrap();
  assert!(children.iter().all(|c| c.length() == Some(3)));

  let children = fork(IterPipe::new(vec![1, 2, 3]), 2, 4).unwrap();
  assert!(children.iter().all(|c| c.length().is_none()));
}

#[test]
fn test_fork_upstream_error_is_not_fatal() {
  #[derive(Debug)]
  struct Flaky;
  impl std::fmt::Display for Flaky {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "flaky")
    }
  }
  impl std::error::Error for Flaky {}

  let source = TryIterPipe::new(vec![Ok(1), Err(Flaky), Ok(2)]);
  let mut children = fork(source, 2, 4).unwrap();

  assert_eq!(children[0].pull().unwrap(), Some(1));
  let err = children[0].pull().unwrap_err();
  assert!(matches!(err, PipeError::Source(_)));
  assert!(!err.is_fatal());
  assert_eq!(children[0].pull().unwrap(), Some(2));
  assert_eq!(children.pop().unwrap().collect_all().unwrap(), vec![1, 2]);
}

#[test]
fn test_fork_rejects_invalid_config() {
  assert!(matches!(
    fork(IterPipe::new(0..1), 0, 10),
    Err(PipeError::ZeroInstances { combinator: "fork" })
  ));
  assert!(matches!(
    fork(IterPipe::new(0..1), 2, 0),
    Err(PipeError::ZeroCapacity { combinator: "fork" })
  ));
}

#[test]
fn test_fork_with_config_uses_name() {
  let config = FanOutConfig::new(2).with_buffer_size(8).with_name("tee");
  let children = fork_with_config(IterPipe::new(0..1), config).unwrap();
  assert_eq!(children[0].controller().name(), "tee");
  assert_eq!(children[1].controller().buffer_size(), 8);
}
