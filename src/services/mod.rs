// Service exports
pub mod cache;
pub mod normalize;
pub mod postgres;
pub mod supabase;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use postgres::{EventType, InteractionStore, PostgresError, SeenStats};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
