//! Packaging HTML into a Word document.
//!
//! The HTML is stored as an MHT part and referenced from the document body
//! through `w:altChunk`; Word converts it to native content when the file
//! is opened.

use std::io::{Cursor, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// MIME type of `.docx` documents.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Relationship id of the HTML chunk in `word/_rels/document.xml.rels`.
const CHUNK_ID: &str = "htmlChunk";
const MHT_BOUNDARY: &str = "----=mhtDocumentPart";

/// Package a complete HTML document as a `.docx` blob.
pub fn html_to_docx(html: &str) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    write_part(&mut zip, options, "[Content_Types].xml", CONTENT_TYPES)?;
    write_part(&mut zip, options, "_rels/.rels", ROOT_RELS)?;
    write_part(&mut zip, options, "word/document.xml", &document_xml())?;
    write_part(&mut zip, options, "word/_rels/document.xml.rels", &document_rels())?;
    write_part(&mut zip, options, "word/afchunk.mht", &mht_part(html))?;

    let bytes = zip.finish()?.into_inner();
    tracing::debug!(html = html.len(), bytes = bytes.len(), "packaged docx");
    Ok(bytes)
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
    name: &str,
    content: &str,
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="mht" ContentType="message/rfc822"/>
    <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

fn document_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <w:body>
        <w:altChunk r:id="{CHUNK_ID}"/>
        <w:sectPr>
            <w:pgSz w:w="12240" w:h="15840" w:orient="portrait"/>
            <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/>
        </w:sectPr>
    </w:body>
</w:document>"#
    )
}

fn document_rels() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="{CHUNK_ID}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/aFChunk" Target="afchunk.mht"/>
</Relationships>"#
    )
}

/// MIME (MHT) wrapper around the HTML. The body is declared
/// quoted-printable, so literal `=` signs are escaped.
fn mht_part(html: &str) -> String {
    let body = html.replace('=', "=3D");
    format!(
        "MIME-Version: 1.0\r\n\
         Content-Type: multipart/related; type=\"text/html\"; boundary=\"{MHT_BOUNDARY}\"\r\n\
         \r\n\
         --{MHT_BOUNDARY}\r\n\
         Content-Type: text/html; charset=\"utf-8\"\r\n\
         Content-Transfer-Encoding: quoted-printable\r\n\
         Content-Location: file:///C:/fake/document.html\r\n\
         \r\n\
         {body}\r\n\
         \r\n\
         --{MHT_BOUNDARY}--\r\n"
    )
}
