pub mod hover;
pub mod scopes;

pub use hover::{Hover, hover_at};
pub use scopes::{ScopedToken, meta_scope, project, scoped_spans};
