//! xlsxform - Streaming DrawingML transforms for spreadsheet shapes
//!
//! This crate converts the shape layer of a spreadsheet (shapes, connectors, their text
//! bodies and page breaks) between an in-memory object model and the drawing markup
//! stored in XLSX packages. Parsing is a single pass over the event stream; each element
//! type is handled by a small, symmetric transform that can both parse and render it.
//!
//! # Quick Start
//!
//! ```rust
//! use xlsxform::shape::{PropsDescriptor, ShapeDescriptor};
//! use xlsxform::types::{Color, Outline};
//! use xlsxform::ShapeSheet;
//!
//! fn main() -> Result<(), xlsxform::XformError> {
//!     let mut sheet = ShapeSheet::new();
//!
//!     // A line from B2 to D6 with an explicit outline
//!     let props = PropsDescriptor::new("line").with_outline(Outline {
//!         weight: Some(12700),
//!         color: Some(Color::theme("accent1")),
//!         ..Outline::default()
//!     });
//!     sheet.add_shape(ShapeDescriptor::new(props, "B2:D6").with_name("Arrow"))?;
//!
//!     // Render the drawing part (xdr:wsDr)
//!     let xml = sheet.to_drawing_xml()?;
//!     assert!(xml.contains("xdr:cxnSp"));
//!
//!     // Read it back
//!     let reloaded = ShapeSheet::from_drawing_xml(&xml, sheet.options().clone())?;
//!     assert_eq!(reloaded.shapes(), sheet.shapes());
//!     Ok(())
//! }
//! ```
//!
//! # Individual Transforms
//!
//! Every element transform can be used on its own:
//!
//! ```rust
//! use xlsxform::types::PageBreak;
//! use xlsxform::xform::{parse_str, render_to_string, PageBreaksXform};
//!
//! # fn main() -> Result<(), xlsxform::XformError> {
//! let mut xform = PageBreaksXform::rows();
//! let xml = render_to_string(&xform, &vec![PageBreak::manual(5)])?;
//! assert_eq!(
//!     xml,
//!     r#"<rowBreaks count="1" manualBreakCount="1"><brk id="5" man="1"/></rowBreaks>"#
//! );
//! assert_eq!(parse_str(&mut xform, &xml)?, Some(vec![PageBreak::manual(5)]));
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust
//! use xlsxform::{DrawingOptionsBuilder, ParseLimits, ShapeSheet};
//!
//! # fn main() -> Result<(), xlsxform::XformError> {
//! let options = DrawingOptionsBuilder::new()
//!     .with_indent(Some(2))
//!     .with_limits(ParseLimits {
//!         max_depth: 64,
//!         ..ParseLimits::default()
//!     })
//!     .build()?;
//! let sheet = ShapeSheet::with_options(options);
//! assert!(sheet.is_empty());
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod security;
mod sheet;

pub mod shape;
pub mod types;
pub mod xform;
pub mod xml;

// 公開API
pub use api::{EditAs, ShapeSelector, TextAlignment, VerticalAlignment};
pub use builder::{
    DrawingOptions, DrawingOptionsBuilder, DEFAULT_COLUMN_WIDTH_EMU, DEFAULT_ROW_HEIGHT_EMU,
};
pub use error::{Result, XformError};
pub use security::ParseLimits;
pub use shape::{Shape, ShapeDescriptor};
pub use sheet::ShapeSheet;
pub use xml::{Attributes, XmlNode, XmlSink};
