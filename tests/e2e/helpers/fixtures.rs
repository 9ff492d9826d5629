use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// What the mocked generation backend answers to every prompt
pub const MOCK_SCRIPT: &str = "Welcome to Deep Dive. Today we follow a river from the mountains \
to the sea and look at how it carves the valleys along the way. Stay with us.";

/// Streamed answer, delivered as one delta per word
pub const STREAMED_SCRIPT: &str = "Bienvenue à « Plongée » : le café du señor, über die Flüsse, \
et ça coule jusqu'à la mer.";

const PARAGRAPHS: [&str; 4] = [
    "Rivers begin as small streams high in the mountains, fed by melting snow and steady rain.",
    "As the water gathers speed it picks up gravel and sand, grinding the rock beneath it into smooth channels.",
    "Over thousands of years these channels widen into valleys, and the river slows as the land flattens out.",
    "Near the coast the river drops what it carried, building wide deltas where farms and cities later grow.",
];

pub fn article_html() -> String {
    let body: String = PARAGRAPHS.iter().map(|p| format!("<p>{}</p>", p)).collect();
    format!(
        "<!DOCTYPE html><html><head><title>Rivers</title><script>window.analytics = true;</script></head>\
         <body><nav>Home | About | Contact us today</nav>\
         <article><h1>How rivers shape valleys</h1>{}</article>\
         <footer>Copyright 2024 Rivers Weekly, all rights reserved</footer></body></html>",
        body
    )
}

pub fn short_html() -> String {
    "<html><body><p>Nothing to see.</p></body></html>".to_string()
}

/// A small PDF with one paragraph per page
pub fn pdf_bytes() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for paragraph in PARAGRAPHS {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![40.into(), 740.into()]),
                Operation::new("Tj", vec![Object::string_literal(paragraph)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
