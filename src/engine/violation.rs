// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::path::Path;
use crate::value::FieldValue;

/// One reported constraint violation.
///
/// The path is a deep copy taken at emission time; jobs keep mutating
/// their working path afterwards. The message is already interpolated by
/// the collector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// The violated constraint's kind name.
    pub kind: String,
    /// Interpolated, user-facing message.
    pub message: String,
    /// The template the message was rendered from.
    pub message_template: String,
    /// Path from the validation root to the offending element.
    pub path: Path,
    /// The value that failed, when one exists at the leaf.
    pub invalid_value: Option<FieldValue>,
    /// Entity type of the validation root.
    pub root_type: String,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathNode;

    #[test]
    fn test_display_joins_path_and_message() {
        let mut path = Path::root();
        path.push(PathNode::property("name"));
        let violation = ConstraintViolation {
            kind: "NotBlank".into(),
            message: "must not be blank".into(),
            message_template: "{NotBlank.message}".into(),
            path,
            invalid_value: Some(FieldValue::text("")),
            root_type: "User".into(),
        };
        assert_eq!(violation.to_string(), "name: must not be blank");
    }
}
