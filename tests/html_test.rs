use pop_corpus::html_to_text;

#[test]
fn test_paragraph_break_and_bold() {
    assert_eq!(html_to_text("<p>Hello</p><br><b>World</b>"), "Hello\nWorld");
}

#[test]
fn test_script_and_style_removed() {
    let html = "<html><head><style>body { color: red; }</style>\
                <script>alert('x')</script></head>\
                <body>Visible</body></html>";
    assert_eq!(html_to_text(html), "Visible");
}

#[test]
fn test_br_variants() {
    assert_eq!(html_to_text("a<br/>b<BR >c< br / >d"), "a\nb\nc\nd");
}

#[test]
fn test_block_closers_become_newlines() {
    let html = "<h1>Title</h1><div>One</div><ul><li>Two</li></ul>\
                <table><tr><td>Three</td></tr></table>";
    assert_eq!(html_to_text(html), "Title\nOne\nTwo\nThree");
}

#[test]
fn test_opening_block_tags_are_not_breaks() {
    assert_eq!(html_to_text("a<p>b"), "ab");
}

#[test]
fn test_entities_unescaped_after_tag_strip() {
    assert_eq!(html_to_text("Fish &amp; Chips"), "Fish & Chips");
    assert_eq!(html_to_text("&lt;b&gt;not bold&lt;/b&gt;"), "<b>not bold</b>");
    assert_eq!(html_to_text("caf&eacute; &#233; &#x41;"), "café é A");
}

#[test]
fn test_whitespace_collapsing() {
    assert_eq!(html_to_text("  a \t\t b  "), "a b");
    assert_eq!(html_to_text("<p>a</p>\n\n\n<p>b</p>"), "a\nb");
}

#[test]
fn test_multiline_tag_stripped() {
    assert_eq!(html_to_text("x<a\nhref=\"y\">link</a>z"), "xlinkz");
}

#[test]
fn test_empty_input() {
    assert_eq!(html_to_text(""), "");
    assert_eq!(html_to_text("<div></div>"), "");
}

#[test]
fn test_idempotent_on_own_output() {
    let inputs = [
        "<p>Hello</p><br><b>World</b>",
        "<div>One</div>\n\n<div>Two   three</div>",
        "plain text already",
        "<h2>Sale!</h2><p>50% &amp; more</p>",
    ];

    for input in inputs {
        let once = html_to_text(input);
        assert_eq!(html_to_text(&once), once, "input: {input}");
    }
}

#[test]
fn test_output_has_no_markup() {
    let html = "<table><tr><td><a href=\"https://x\">Click</a></td></tr></table>\
                <img src=\"a.png\"/><p style=\"x\">Done</p>";
    let text = html_to_text(html);
    assert!(!text.contains('<'));
    assert!(!text.contains('>'));
    assert_eq!(text, "Click\nDone");
}
