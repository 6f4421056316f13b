//! Current duty-block inference.
//!
//! Given every `(date, group)` pair the
//! calendar shows, decide whether a
//! group is on duty today and until
//! when, or how far away its next duty
//! day is. Blocks are recomputed on
//! every call from the injected list;
//! nothing is cached between calls.

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

use crate::datetime::days_between;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
pub struct DutyDate {
  pub date:  NaiveDate,
  pub group: String
}

impl DutyDate {
  pub fn new(
    date: NaiveDate,
    group: impl Into<String>
  ) -> Self {
    Self {
      date,
      group: group.into()
    }
  }
}

/// Maximal run of consecutive days of
/// one group. Invariant: `start <= end`
/// and every day in between belongs to
/// the group.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct DutyBlock {
  pub start: NaiveDate,
  pub end:   NaiveDate
}

impl DutyBlock {
  #[must_use]
  pub fn contains(
    &self,
    date: NaiveDate
  ) -> bool {
    self.start <= date
      && date <= self.end
  }

  #[must_use]
  pub fn len_days(&self) -> i64 {
    days_between(self.start, self.end)
      + 1
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(
  tag = "state",
  rename_all = "snake_case"
)]
pub enum DutyStatus {
  /// Today lies inside `block`.
  /// `days_remaining` counts today.
  OnDuty {
    block:          DutyBlock,
    days_remaining: i64
  },
  Upcoming {
    next:       NaiveDate,
    days_until: i64
  },
  /// The group has no date today and
  /// none after it.
  Unavailable
}

impl DutyStatus {
  #[must_use]
  pub fn is_on_duty(&self) -> bool {
    matches!(self, Self::OnDuty { .. })
  }

  /// Days until the next occurrence;
  /// zero when there is none.
  #[must_use]
  pub fn days_until_next(&self) -> i64 {
    match self {
      | Self::Upcoming {
        days_until,
        ..
      } => *days_until,
      | _ => 0
    }
  }

  #[must_use]
  pub fn next_date(
    &self
  ) -> Option<NaiveDate> {
    match self {
      | Self::Upcoming {
        next, ..
      } => Some(*next),
      | _ => None
    }
  }

  #[must_use]
  pub fn current_block(
    &self
  ) -> Option<DutyBlock> {
    match self {
      | Self::OnDuty {
        block, ..
      } => Some(*block),
      | _ => None
    }
  }
}

/// Sorted, de-duplicated dates of one
/// group.
#[must_use]
pub fn group_dates(
  group: &str,
  all_dates: &[DutyDate]
) -> Vec<NaiveDate> {
  let mut dates: Vec<NaiveDate> =
    all_dates
      .iter()
      .filter(|entry| {
        entry.group == group
      })
      .map(|entry| entry.date)
      .collect();
  dates.sort_unstable();
  dates.dedup();
  dates
}

/// Grows a block outwards from
/// `dates[index]` while neighbours are
/// exactly one day apart. `dates` must
/// be sorted and free of duplicates.
#[must_use]
pub fn block_around(
  dates: &[NaiveDate],
  index: usize
) -> DutyBlock {
  let mut first = index;
  while first > 0
    && days_between(
      dates[first - 1],
      dates[first]
    ) <= 1
  {
    first -= 1;
  }

  let mut last = index;
  while last + 1 < dates.len()
    && days_between(
      dates[last],
      dates[last + 1]
    ) <= 1
  {
    last += 1;
  }

  DutyBlock {
    start: dates[first],
    end:   dates[last]
  }
}

/// Splits a group's dates into its
/// duty blocks, in calendar order.
#[must_use]
pub fn duty_blocks(
  group: &str,
  all_dates: &[DutyDate]
) -> Vec<DutyBlock> {
  let dates =
    group_dates(group, all_dates);
  let mut blocks = Vec::new();
  let mut index = 0_usize;
  while index < dates.len() {
    let block =
      block_around(&dates, index);
    blocks.push(block);
    index += usize::try_from(
      block.len_days()
    )
    .unwrap_or(1)
    .max(1);
  }
  blocks
}

#[tracing::instrument(
  level = "debug",
  skip(all_dates),
  fields(entries = all_dates.len())
)]
pub fn resolve(
  group: &str,
  all_dates: &[DutyDate],
  today: NaiveDate
) -> DutyStatus {
  let dates =
    group_dates(group, all_dates);

  if let Ok(index) =
    dates.binary_search(&today)
  {
    let block =
      block_around(&dates, index);
    let days_remaining =
      days_between(today, block.end) + 1;
    tracing::debug!(
      start = %block.start,
      end = %block.end,
      days_remaining,
      "group is on duty"
    );
    return DutyStatus::OnDuty {
      block,
      days_remaining
    };
  }

  match dates
    .iter()
    .find(|date| **date > today)
  {
    | Some(next) => {
      let days_until =
        days_between(today, *next);
      tracing::debug!(
        next = %next,
        days_until,
        "next duty day found"
      );
      DutyStatus::Upcoming {
        next: *next,
        days_until
      }
    }
    | None => {
      tracing::debug!(
        dates = dates.len(),
        "no current or upcoming duty"
      );
      DutyStatus::Unavailable
    }
  }
}
