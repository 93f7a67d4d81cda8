pub(crate) mod fixtures;

mod logging_env;

mod stub;
pub(crate) use stub::StubTransport;
