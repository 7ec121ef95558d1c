//! The known-tag vocabulary.
//!
//! Type selectors are resolved against this table at compile time: an
//! unknown tag name fails compilation instead of silently producing a
//! selector that can never match, so typos like `il` for `li` surface as
//! errors.
//!
//! The table covers the HTML element names (current and obsolete), the SVG
//! element names, and the MathML element names, all lower-cased. Lookup is
//! ASCII-case-insensitive, matching HTML's tag name semantics.

/// Every recognized element name, sorted for binary search.
static KNOWN_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "animate", "animatemotion",
    "animatetransform", "annotation", "annotation-xml", "area", "article",
    "aside", "audio", "b", "base", "basefont", "bdi", "bdo", "big",
    "blockquote", "body", "br", "button", "canvas", "caption", "center",
    "circle", "cite", "clippath", "code", "col", "colgroup", "data",
    "datalist", "dd", "defs", "del", "desc", "details", "dfn", "dialog",
    "dir", "div", "dl", "dt", "ellipse", "em", "embed", "feblend",
    "fecolormatrix", "fecomponenttransfer", "fecomposite",
    "feconvolvematrix", "fediffuselighting", "fedisplacementmap",
    "fedistantlight", "fedropshadow", "feflood", "fefunca", "fefuncb",
    "fefuncg", "fefuncr", "fegaussianblur", "feimage", "femerge",
    "femergenode", "femorphology", "feoffset", "fepointlight",
    "fespecularlighting", "fespotlight", "fetile", "feturbulence",
    "fieldset", "figcaption", "figure", "filter", "font", "footer",
    "foreignobject", "form", "frame", "frameset", "g", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i",
    "iframe", "image", "img", "input", "ins", "kbd", "keygen", "label",
    "legend", "li", "line", "lineargradient", "link", "maction", "main",
    "map", "mark", "marker", "marquee", "mask", "math", "menu", "menuitem",
    "merror", "meta", "metadata", "meter", "mfrac", "mi", "mmultiscripts",
    "mn", "mo", "mover", "mpadded", "mpath", "mphantom", "mprescripts",
    "mroot", "mrow", "ms", "mspace", "msqrt", "mstyle", "msub", "msubsup",
    "msup", "mtable", "mtd", "mtext", "mtr", "munder", "munderover", "nav",
    "nobr", "noframes", "noscript", "object", "ol", "optgroup", "option",
    "output", "p", "param", "path", "pattern", "picture", "polygon",
    "polyline", "pre", "progress", "q", "radialgradient", "rb", "rect",
    "rp", "rt", "rtc", "ruby", "s", "samp", "script", "search", "section",
    "select", "semantics", "set", "slot", "small", "source", "span",
    "stop", "strike", "strong", "style", "sub", "summary", "sup", "svg",
    "switch", "symbol", "table", "tbody", "td", "template", "text",
    "textarea", "textpath", "tfoot", "th", "thead", "time", "title", "tr",
    "track", "tspan", "tt", "u", "ul", "use", "var", "video", "view",
    "wbr", "xmp",
];

/// Resolve a tag name against the vocabulary, ASCII-case-insensitively.
/// Returns the canonical (lower-case, `'static`) name on success.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static str> {
    let lowered = name.to_ascii_lowercase();
    KNOWN_TAGS
        .binary_search(&lowered.as_str())
        .ok()
        .map(|i| KNOWN_TAGS[i])
}
