pub(crate) mod field_session;
