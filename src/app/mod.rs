// Application layer - Session orchestration

pub mod split_session;

pub use split_session::SplitSession;
