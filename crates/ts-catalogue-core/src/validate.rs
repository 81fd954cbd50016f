use crate::catalogue::Catalogue;
use crate::model::Message;
use crate::placeholder::placeholders;
use std::fmt;

/// A translation whose placeholders disagree with its source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaceholderIssue {
    /// The translation refers to an argument the source never uses.
    Unknown { placeholder: usize, form: usize },
    /// The translation drops an argument the source uses.
    Omitted { placeholder: usize, form: usize },
}

impl fmt::Display for PlaceholderIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { placeholder, form } => {
                write!(f, "form {} uses %{} which the source does not", form, placeholder)
            },
            Self::Omitted { placeholder, form } => {
                write!(f, "form {} drops %{}", form, placeholder)
            },
        }
    }
}

/// Compares the `%1..%99` placeholders of each translated form against the
/// source. `%n` is ignored and so are empty forms and inactive messages.
pub fn check_placeholders(message: &Message) -> Vec<PlaceholderIssue> {
    if !message.is_active() {
        return Vec::new();
    }

    let expected = placeholders(&message.source);
    let mut issues = Vec::new();
    for (form, text) in message.translation.forms().iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        let used = placeholders(text);
        issues.extend(
            used.difference(&expected)
                .map(|placeholder| PlaceholderIssue::Unknown {
                    placeholder: *placeholder,
                    form,
                }),
        );
        issues.extend(
            expected
                .difference(&used)
                .map(|placeholder| PlaceholderIssue::Omitted {
                    placeholder: *placeholder,
                    form,
                }),
        );
    }
    issues
}

/// A [`PlaceholderIssue`] together with where it was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocatedIssue<'a> {
    pub context: &'a str,
    pub message: &'a Message,
    pub issue: PlaceholderIssue,
}

impl Catalogue {
    /// Every placeholder issue, in document order.
    pub fn placeholder_issues(&self) -> Vec<LocatedIssue<'_>> {
        self.contexts()
            .iter()
            .flat_map(|context| {
                context.messages.iter().flat_map(move |message| {
                    check_placeholders(message)
                        .into_iter()
                        .map(move |issue| LocatedIssue {
                            context: &context.name,
                            message,
                            issue,
                        })
                })
            })
            .collect()
    }
}
