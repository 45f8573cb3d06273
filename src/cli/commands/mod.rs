pub mod api;
pub mod property;
pub mod unit;

use reqwest::RequestBuilder;

/// Common pagination and sorting parameters for all list commands
#[derive(Debug, Default)]
pub struct PageParams<'a> {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<&'a str>,
    pub order: Option<&'a str>,
}

impl PageParams<'_> {
    /// Append the set parameters to a list request.
    pub fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(l) = self.limit {
            request = request.query(&[("limit", l.to_string())]);
        }
        if let Some(o) = self.offset {
            request = request.query(&[("offset", o.to_string())]);
        }
        if let Some(s) = self.sort {
            request = request.query(&[("sort", s)]);
        }
        if let Some(ord) = self.order {
            request = request.query(&[("order", ord)]);
        }
        request
    }
}

#[cfg(test)]
mod test_support;


#[cfg(test)]
#[path = "property_test.rs"]
mod property_test;

#[cfg(test)]
#[path = "unit_test.rs"]
mod unit_test;
