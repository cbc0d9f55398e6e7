use futures::stream::{self, Stream, StreamExt};
use sovran_mapper::stream::cancellable;
use sovran_mapper::{try_from_fn, Mapper};
use std::time::Duration;

#[derive(Debug)]
struct Page {
    number: u32,
    rows: Vec<String>,
}

#[derive(Debug)]
struct Summary {
    page: u32,
    row_count: usize,
}

#[derive(Debug)]
enum QueryError {
    EmptyPage(u32),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::EmptyPage(n) => write!(f, "page {} came back empty", n),
        }
    }
}

// Pretend remote query: one page per request, forever
fn remote_pages() -> impl Stream<Item = Page> {
    stream::unfold(1u32, |number| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let rows = (0..number % 4).map(|i| format!("row {}.{}", number, i)).collect();
        Some((Page { number, rows }, number + 1))
    })
}

fn summarize(page: &Page) -> Result<Summary, QueryError> {
    if page.rows.is_empty() {
        return Err(QueryError::EmptyPage(page.number));
    }
    Ok(Summary {
        page: page.number,
        row_count: page.rows.len(),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mapper = Mapper::new(try_from_fn(summarize));

    // Pages are fetched only as summaries are consumed
    let (summaries, handle) = cancellable(mapper.map_stream(remote_pages()));
    let mut summaries = Box::pin(summaries);
    let mut seen = 0;
    while let Some(summary) = summaries.next().await {
        match summary {
            Ok(s) => println!("page {}: {} rows", s.page, s.row_count),
            Err(e) => println!("stopped: {}", e),
        }
        seen += 1;
        if seen == 2 {
            handle.abort();
        }
    }
    println!("cancelled after {} pages: {}", seen, summaries.is_aborted());

    // Without cancellation the first empty page ends the stream
    let all: Vec<_> = mapper.map_stream(remote_pages()).collect().await;
    for result in &all {
        match result {
            Ok(s) => println!("page {}: {} rows", s.page, s.row_count),
            Err(e) => println!("stopped: {}", e),
        }
    }
}
