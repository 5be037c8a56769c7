#![allow(clippy::print_stdout, clippy::print_stderr, reason = "Fine in examples")]
use std::{env, fs};

use mdpdf_annotate::{AnnotateOptions, Annotator, OutlineNode};

fn print_outline(nodes: &[OutlineNode], indent: usize) {
  for node in nodes {
    println!(
      "{:indent$}- {} -> #{}",
      "",
      node.heading.text,
      node.heading.slug,
      indent = indent * 2
    );
    print_outline(&node.children, indent + 1);
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let Some(path) = env::args().nth(1) else {
    eprintln!("usage: outline <FILE.md>");
    return Ok(());
  };

  let markdown = fs::read_to_string(&path)?;
  let document =
    Annotator::new(AnnotateOptions::default()).annotate_markdown(&markdown)?;

  println!("Title: {}", document.title.as_deref().unwrap_or("(none)"));
  println!("Headings: {}", document.headings.len());
  match &document.toc {
    Some(toc) => print_outline(&toc.outline, 0),
    None => println!("No table of contents (fewer than two headings)"),
  }

  println!("\n{}", document.body);
  Ok(())
}
