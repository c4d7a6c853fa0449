mod create_request;
mod helpers;
mod list;
mod resolve_request;
