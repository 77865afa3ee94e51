// Data model: intake schema, wizard state, submission payload

pub mod payload;
pub mod schema;
pub mod state;
