pub(crate) mod publish;
pub(crate) mod push;
pub(crate) mod research;
pub(crate) mod reset;
