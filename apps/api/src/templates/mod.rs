// Template catalog: public listing/detail plus admin-gated management.

pub mod handlers;
