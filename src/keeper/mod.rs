pub mod archive;
pub mod codec;
pub mod conflict;
pub mod fsops;
pub mod host;
pub mod resolve;
pub mod scan;
pub mod settings;
pub mod snapshot;
pub mod warn;
