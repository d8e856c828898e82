pub mod export_xml;
