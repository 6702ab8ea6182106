pub(crate) mod admin;
pub(crate) mod auth_routes;
pub(crate) mod directors;
pub(crate) mod handlers;
pub(crate) mod inquiries;
pub(crate) mod properties;
