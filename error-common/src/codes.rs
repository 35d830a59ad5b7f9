// Standardized error codes carried in API error envelopes

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
}

pub mod authentication {
    pub const INVALID_CREDENTIALS: &str = "AUTH_2001";
}

pub mod authorization {
    pub const ACCESS_DENIED: &str = "AUTHZ_3001";
}

pub mod ticketing {
    pub const SOLD_OUT: &str = "TICKET_4001";
    pub const ALREADY_REGISTERED: &str = "TICKET_4002";
    pub const LOCKED_FIELD: &str = "TICKET_4003";
}

pub mod database {
    pub const CONNECTION_FAILED: &str = "DB_5001";
    pub const QUERY_FAILED: &str = "DB_5002";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_6001";
}

pub mod internal {
    pub const UNEXPECTED: &str = "INTERNAL_7001";
}
