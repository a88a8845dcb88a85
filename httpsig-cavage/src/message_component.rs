/// Literal token of the request-target pseudo-header. Synthesized from method
/// and path when it appears in the covered-header order, never looked up in
/// the actual header set.
pub const REQUEST_TARGET: &str = "(request-target)";

/* ---------------------------------------- */
#[derive(Debug, Clone, PartialEq, Eq)]
/// One line of the canonical signing string
pub enum MessageComponent {
  /// Synthesized `(request-target): <method> <path>` line
  RequestTarget { method: String, path: String },
  /// `<name>: <value>[, <value>...]` line for a covered header
  HttpField { name: String, values: Vec<String> },
}

impl MessageComponent {
  /// Covered-header name this line stands for
  pub fn name(&self) -> &str {
    match self {
      Self::RequestTarget { .. } => REQUEST_TARGET,
      Self::HttpField { name, .. } => name,
    }
  }
}

impl std::fmt::Display for MessageComponent {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::RequestTarget { method, path } => write!(f, "{REQUEST_TARGET}: {method} {path}"),
      Self::HttpField { name, values } => write!(f, "{}: {}", name, values.join(", ")),
    }
  }
}

/* ---------------------------------------- */
