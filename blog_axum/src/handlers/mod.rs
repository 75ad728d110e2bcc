pub(crate) mod admin_pages;
pub(crate) mod ai;
pub(crate) mod api_key;
pub(crate) mod articles;
pub(crate) mod auth;
pub(crate) mod images;
pub(crate) mod public;
pub(crate) mod settings;
pub(crate) mod taxonomy;
