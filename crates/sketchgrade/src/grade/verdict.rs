//! Tri-valued predicate outcome.

use serde::{Deserialize, Serialize};

/// Pass, fail, or no data in the queried range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    Ndef,
}

impl Verdict {
    #[inline]
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    #[inline]
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }

    #[inline]
    pub fn is_ndef(self) -> bool {
        self == Verdict::Ndef
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        Verdict::from_bool(ok)
    }
}
