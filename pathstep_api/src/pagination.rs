use serde::Serialize;

#[derive(Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> PaginatedResponse<T> {
    pub fn single_page(data: Vec<T>) -> Self {
        PaginatedResponse {
            page: 1,
            per_page: data.len(),
            total: data.len(),
            total_pages: 1,
            data,
        }
    }
}
