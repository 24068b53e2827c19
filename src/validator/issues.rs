use crate::spec::SpecError;

/// A problem found in the description document while preparing routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<&SpecError> for ValidationIssue {
    fn from(err: &SpecError) -> Self {
        let location = match err {
            SpecError::UnsupportedReferenceKind { pointer }
            | SpecError::UnresolvedReference { pointer, .. } => pointer.clone(),
            SpecError::UnsupportedField { path, .. } => format!("paths.{path}"),
            SpecError::MalformedDocument { location, .. }
            | SpecError::MalformedSchema { location, .. } => location.clone(),
        };
        ValidationIssue::new(location, err.kind(), err.to_string())
    }
}

/// Render issues as the block printed before a refused startup.
pub fn format_issues(issues: &[ValidationIssue]) -> String {
    let mut out = format!(
        "\n❌ Description document rejected. {} issue(s) found:\n\n",
        issues.len()
    );
    for issue in issues {
        out.push_str(&format!(
            "[{}] {}: {}\n",
            issue.kind, issue.location, issue.message
        ));
    }
    out.push_str("\nFix the document before starting the server.\n");
    out
}

pub fn print_issues(issues: &[ValidationIssue]) {
    eprint!("{}", format_issues(issues));
}
