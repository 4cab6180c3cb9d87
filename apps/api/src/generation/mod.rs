// Drafting of form prose through the Generation Client. Handlers return the
// updated document so the form can replace its state in one step.

pub mod drafts;
pub mod handlers;
