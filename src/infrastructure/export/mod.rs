mod anki_exporter;

pub use anki_exporter::AnkiExporter;
