// HTTP client for the remote quote collection endpoint
pub mod remote;

pub use remote::{RemoteClient, RemoteError, RemoteItem};
