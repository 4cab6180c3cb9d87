// Preview/Print Shell: preview sessions over the mounted visual tree, with
// cosmetic download progress and print via an overlay copy.

pub mod handlers;
pub mod progress;
pub mod registry;
pub mod shell;

pub use registry::PreviewRegistry;
pub use shell::{PreviewShell, ShellError, ShellStatus};
