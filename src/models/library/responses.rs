use serde::Serialize;
use ts_rs::TS;

use super::entities::{Book, BookCopy};

/// 图书及其全部副本
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct BookDetail {
    pub book: Book,
    pub copies: Vec<BookCopy>,
}
