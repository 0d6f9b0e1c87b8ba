//! JSON envelopes. Dashboard endpoints answer `{ "data": ... }`; login,
//! refresh, and the public booth config are returned bare.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a listing plus the paging window that produced it.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub data: Vec<T>,
    /// Rows matching the filter, ignoring `limit`/`offset`.
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            data,
            total,
            limit,
            offset,
        }
    }
}
