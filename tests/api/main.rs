mod chat;
mod helpers;
mod postgres;
