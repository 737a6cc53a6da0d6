pub mod draft_flush;
