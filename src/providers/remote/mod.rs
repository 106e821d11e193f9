pub mod implementations;
pub mod trait_remote;

pub use implementations::github_provider::GithubRemoteProvider;
pub use implementations::test_provider::ScriptedRemoteProvider;
pub use trait_remote::RemoteProvider;
