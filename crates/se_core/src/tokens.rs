//! ID token types (`StageId`, `GroupId`, `UserId`) with strict charset.
//!
//! Tokens mirror the identifier columns of the backing store
//! (`stageId`, `groupId`, `userEmail`); `UserId` therefore admits `@`
//! so plain e-mail addresses parse as-is.

use crate::errors::CoreError;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn is_token(s: &str) -> bool {
    let len = s.len();
    if !(1..=128).contains(&len) {
        return false;
    }
    s.bytes().all(|b| matches!(b,
        b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
        b'_' | b'-' | b':' | b'.' | b'@' | b'+'
    ))
}

macro_rules! def_token {
    ($name:ident) => {
        #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if is_token(s) {
                    Ok(Self(s.to_string()))
                } else {
                    Err(CoreError::InvalidToken)
                }
            }
        }
    };
}

def_token!(StageId);
def_token!(GroupId);
def_token!(UserId);
