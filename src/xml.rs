//! XML interchange for article records
//!
//! Documents are read into an intermediate field map keyed by schema field,
//! then mapped onto records. Element names come exclusively from the
//! [`ArticleSchema`] tables, so legacy and current documents share one
//! reader and one writer.
//!
//! Layout (legacy schema; the current schema adds `<id>` elements):
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
//! <newsArticle>
//!   <author>Staff writer</author>
//!   <date>2016-03-01 10:15</date>
//!   <title>Budget passed</title>
//!   <body>The budget was passed today.</body>
//!   <url>http://news.example.lk/budget</url>
//!   <comments>
//!     <comment>
//!       <author>reader</author>
//!       <body>Finally.</body>
//!     </comment>
//!   </comments>
//! </newsArticle>
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::{trace, warn};

use crate::current::{Comment, NewsArticle};
use crate::legacy::{LegacyArticle, LegacyComment};
use crate::schema::{
    ArticleField, ArticleSchema, CURRENT_SCHEMA, CommentField, LEGACY_SCHEMA, SchemaVersion,
};
use crate::{ArchiveError, MigrationConfig, Result};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// Field values of one document, keyed by schema field
#[derive(Debug, Default, PartialEq, Eq)]
struct RawRecord {
    fields: HashMap<ArticleField, String>,
    comments: Vec<HashMap<CommentField, String>>,
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Document,
    Record,
    Wrapper,
    Comment,
    ArticleValue(ArticleField),
    CommentValue(CommentField),
    Done,
}

fn xml_error(err: impl Display) -> ArchiveError {
    ArchiveError::Xml(err.to_string())
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

/// Skip an element we have no mapping for, including its children
fn skip_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    buf: &mut Vec<u8>,
) -> Result<()> {
    warn!("Skipping unknown element <{}>", local_name(start));
    reader.read_to_end_into(start.name(), buf).map_err(xml_error)?;
    buf.clear();
    Ok(())
}

/// Read a document laid out according to `schema`
fn read_record(xml: &str, schema: &ArticleSchema) -> Result<RawRecord> {
    let mut reader = Reader::from_str(xml);

    let mut record = RawRecord::default();
    let mut comment: HashMap<CommentField, String> = HashMap::new();
    let mut text = String::new();
    let mut scope = Scope::Document;

    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(ref e) => {
                let name = local_name(e);
                trace!("Start <{}> in {:?}", name, scope);
                scope = match scope {
                    Scope::Document => {
                        schema.check_root(&name)?;
                        Scope::Record
                    }
                    Scope::Record if name == schema.comments_wrapper => Scope::Wrapper,
                    Scope::Record => match schema.article_field(&name) {
                        Some(field) => {
                            text.clear();
                            Scope::ArticleValue(field)
                        }
                        None => {
                            skip_element(&mut reader, e, &mut skip_buf)?;
                            Scope::Record
                        }
                    },
                    Scope::Wrapper if name == schema.comment => {
                        comment.clear();
                        Scope::Comment
                    }
                    Scope::Comment => match schema.comment_field(&name) {
                        Some(field) => {
                            text.clear();
                            Scope::CommentValue(field)
                        }
                        None => {
                            skip_element(&mut reader, e, &mut skip_buf)?;
                            Scope::Comment
                        }
                    },
                    Scope::Done => {
                        return Err(ArchiveError::Xml(format!(
                            "unexpected element <{name}> after root element"
                        )));
                    }
                    // Markup inside a value, or a non-comment element in the wrapper
                    other => {
                        skip_element(&mut reader, e, &mut skip_buf)?;
                        other
                    }
                };
            }
            Event::Empty(ref e) => {
                let name = local_name(e);
                match scope {
                    Scope::Document => {
                        schema.check_root(&name)?;
                        scope = Scope::Done;
                    }
                    Scope::Record if name == schema.comments_wrapper => {}
                    Scope::Record => match schema.article_field(&name) {
                        Some(field) => {
                            record.fields.insert(field, String::new());
                        }
                        None => warn!("Skipping unknown element <{}/>", name),
                    },
                    Scope::Wrapper if name == schema.comment => {
                        record.comments.push(HashMap::new());
                    }
                    Scope::Comment => match schema.comment_field(&name) {
                        Some(field) => {
                            comment.insert(field, String::new());
                        }
                        None => warn!("Skipping unknown element <{}/>", name),
                    },
                    Scope::Done => {
                        return Err(ArchiveError::Xml(format!(
                            "unexpected element <{name}/> after root element"
                        )));
                    }
                    _ => warn!("Skipping unexpected element <{}/>", name),
                }
            }
            Event::Text(ref e) => {
                if matches!(scope, Scope::ArticleValue(_) | Scope::CommentValue(_)) {
                    text.push_str(&e.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(ref e) => {
                if matches!(scope, Scope::ArticleValue(_) | Scope::CommentValue(_)) {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                scope = match scope {
                    Scope::ArticleValue(field) => {
                        record.fields.insert(field, std::mem::take(&mut text));
                        Scope::Record
                    }
                    Scope::CommentValue(field) => {
                        comment.insert(field, std::mem::take(&mut text));
                        Scope::Comment
                    }
                    Scope::Comment => {
                        record.comments.push(std::mem::take(&mut comment));
                        Scope::Wrapper
                    }
                    Scope::Wrapper => Scope::Record,
                    Scope::Record => Scope::Done,
                    other => {
                        return Err(ArchiveError::Xml(format!(
                            "unbalanced closing tag in {other:?}"
                        )));
                    }
                };
            }
            Event::Eof => match scope {
                Scope::Done => break,
                Scope::Document => return Err(ArchiveError::Xml("empty document".to_string())),
                _ => {
                    return Err(ArchiveError::Xml(
                        "unexpected end of document".to_string(),
                    ));
                }
            },
            // Declaration, doctype, comments, processing instructions
            _ => {}
        }

        buf.clear();
    }

    Ok(record)
}

/// Indenting or compact XML writer over an in-memory buffer
struct XmlOut {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlOut {
    fn new(indent: bool) -> Self {
        let sink = Cursor::new(Vec::new());
        let writer = if indent {
            Writer::new_with_indent(sink, b' ', 2)
        } else {
            Writer::new(sink)
        };
        Self { writer }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(xml_error)
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str) -> Result<()> {
        self.write(Event::Empty(BytesStart::new(name)))
    }

    /// `<name>value</name>`; BytesText escapes entities
    fn value(&mut self, name: &str, value: &str) -> Result<()> {
        self.start(name)?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String> {
        let body = String::from_utf8(self.writer.into_inner().into_inner())?;
        let mut document = String::with_capacity(XML_DECLARATION.len() + body.len());
        document.push_str(XML_DECLARATION);
        document.push_str(&body);
        Ok(document)
    }
}

/// Write `record` laid out according to `schema`
fn write_record(record: &RawRecord, schema: &ArticleSchema, indent: bool) -> Result<String> {
    let mut out = XmlOut::new(indent);
    out.start(schema.root)?;

    for (field, name) in schema.article_fields {
        if let Some(value) = record.fields.get(field) {
            out.value(name, value)?;
        }
    }

    if record.comments.is_empty() {
        out.empty(schema.comments_wrapper)?;
    } else {
        out.start(schema.comments_wrapper)?;
        for comment in &record.comments {
            out.start(schema.comment)?;
            for (field, name) in schema.comment_fields {
                if let Some(value) = comment.get(field) {
                    out.value(name, value)?;
                }
            }
            out.end(schema.comment)?;
        }
        out.end(schema.comments_wrapper)?;
    }

    out.end(schema.root)?;
    out.finish()
}

fn put(map: &mut HashMap<ArticleField, String>, field: ArticleField, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(field, value.to_string());
    }
}

fn put_comment(map: &mut HashMap<CommentField, String>, field: CommentField, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(field, value.to_string());
    }
}

fn parse_id(field: &'static str, value: Option<String>) -> Result<u64> {
    let value = value.ok_or(ArchiveError::MissingField(field))?;
    value
        .trim()
        .parse()
        .map_err(|_| ArchiveError::InvalidValue { field, value })
}

impl RawRecord {
    fn from_legacy(article: &LegacyArticle) -> Self {
        let mut fields = HashMap::new();
        put(&mut fields, ArticleField::Author, article.author());
        put(&mut fields, ArticleField::Date, article.date());
        put(&mut fields, ArticleField::Title, Some(article.title()));
        put(&mut fields, ArticleField::Body, article.body());
        put(&mut fields, ArticleField::Url, article.url());

        let comments = article
            .comments()
            .iter()
            .map(|c| {
                let mut map = HashMap::new();
                put_comment(&mut map, CommentField::Author, c.author());
                put_comment(&mut map, CommentField::Date, c.date());
                put_comment(&mut map, CommentField::Body, Some(c.body()));
                map
            })
            .collect();

        Self { fields, comments }
    }

    fn from_news(article: &NewsArticle) -> Self {
        let mut fields = HashMap::new();
        fields.insert(ArticleField::Id, article.id().to_string());
        put(&mut fields, ArticleField::Author, article.author());
        put(&mut fields, ArticleField::Date, article.date());
        put(&mut fields, ArticleField::Title, Some(article.title()));
        put(&mut fields, ArticleField::Body, Some(article.body()));
        put(&mut fields, ArticleField::Url, article.url());

        let comments = article
            .comments()
            .iter()
            .map(|c| {
                let mut map = HashMap::new();
                map.insert(CommentField::Id, c.id().to_string());
                put_comment(&mut map, CommentField::Author, c.author());
                put_comment(&mut map, CommentField::Date, c.date());
                put_comment(&mut map, CommentField::Body, Some(c.body()));
                map
            })
            .collect();

        Self { fields, comments }
    }

    fn into_legacy(mut self) -> LegacyArticle {
        let mut builder = LegacyArticle::builder()
            .title(self.fields.remove(&ArticleField::Title).unwrap_or_default());
        if let Some(author) = self.fields.remove(&ArticleField::Author) {
            builder = builder.author(author);
        }
        if let Some(date) = self.fields.remove(&ArticleField::Date) {
            builder = builder.date(date);
        }
        if let Some(body) = self.fields.remove(&ArticleField::Body) {
            builder = builder.body(body);
        }
        if let Some(url) = self.fields.remove(&ArticleField::Url) {
            builder = builder.url(url);
        }

        let comments = self
            .comments
            .into_iter()
            .map(|mut map| {
                let mut comment =
                    LegacyComment::new(map.remove(&CommentField::Body).unwrap_or_default());
                if let Some(author) = map.remove(&CommentField::Author) {
                    comment = comment.with_author(author);
                }
                if let Some(date) = map.remove(&CommentField::Date) {
                    comment = comment.with_date(date);
                }
                comment
            })
            .collect();

        builder.comments(comments).build()
    }

    fn into_news(mut self) -> Result<NewsArticle> {
        let id = parse_id("id", self.fields.remove(&ArticleField::Id))?;

        let comments = self
            .comments
            .into_iter()
            .map(|mut map| -> Result<Comment> {
                let id = parse_id("comment id", map.remove(&CommentField::Id))?;
                Ok(Comment::new(
                    id,
                    map.remove(&CommentField::Author),
                    map.remove(&CommentField::Date),
                    map.remove(&CommentField::Body).unwrap_or_default(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut article = NewsArticle::new(
            id,
            self.fields.remove(&ArticleField::Title).unwrap_or_default(),
            self.fields.remove(&ArticleField::Body).unwrap_or_default(),
            comments,
        );
        article.set_author(self.fields.remove(&ArticleField::Author));
        article.set_date(self.fields.remove(&ArticleField::Date));
        article.set_url(self.fields.remove(&ArticleField::Url));
        Ok(article)
    }
}

impl LegacyArticle {
    /// Serialize as a legacy-schema XML document
    ///
    /// Unset fields are left out; the body is written untrimmed.
    pub fn to_xml(&self, config: &MigrationConfig) -> Result<String> {
        write_record(&RawRecord::from_legacy(self), &LEGACY_SCHEMA, config.indent_xml)
    }
}

impl NewsArticle {
    /// Serialize as a current-schema XML document
    pub fn to_xml(&self, config: &MigrationConfig) -> Result<String> {
        write_record(&RawRecord::from_news(self), &CURRENT_SCHEMA, config.indent_xml)
    }
}

/// Parse a legacy-schema XML document
///
/// Missing elements leave the matching field unset; a missing `<title>`
/// gives an empty title. Unknown elements are skipped.
///
/// # Example
///
/// ```
/// use news_archive::parse_legacy_article;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
/// <newsArticle>
///   <title>Budget passed</title>
///   <body>  The budget was passed today.  </body>
///   <comments>
///     <comment><author>reader</author><body>Finally.</body></comment>
///   </comments>
/// </newsArticle>"#;
///
/// let article = parse_legacy_article(xml).unwrap();
/// assert_eq!(article.title(), "Budget passed");
/// assert_eq!(article.body(), Some("  The budget was passed today.  "));
/// assert_eq!(article.author(), None);
/// assert_eq!(article.comments()[0].author(), Some("reader"));
/// ```
pub fn parse_legacy_article(xml: &str) -> Result<LegacyArticle> {
    Ok(read_record(xml, &LEGACY_SCHEMA)?.into_legacy())
}

/// Parse a current-schema XML document
///
/// The article and every comment must carry a numeric `<id>`.
pub fn parse_news_article(xml: &str) -> Result<NewsArticle> {
    read_record(xml, &CURRENT_SCHEMA)?.into_news()
}

/// Tell which schema version a document uses
///
/// A document whose root has a direct `<id>` child is current; otherwise
/// it is legacy.
pub fn detect_version(xml: &str) -> Result<SchemaVersion> {
    let record = read_record(xml, &CURRENT_SCHEMA)?;
    if record.fields.contains_key(&ArticleField::Id) {
        Ok(SchemaVersion::Current)
    } else {
        Ok(SchemaVersion::Legacy)
    }
}
