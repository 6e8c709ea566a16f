pub mod event_writer;
