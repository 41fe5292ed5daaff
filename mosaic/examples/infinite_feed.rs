// Example: drive a gallery by hand, feeding it measurements, visibility and upstream batches.
use mosaic::{BatchOutcome, Gallery, GalleryOptions, MeasurementCache, Stream};

fn main() {
    let options = GalleryOptions::new()
        .with_load_batch_size(6)
        .with_column_width(240)
        .with_on_layout(Some(|u: &mosaic::LayoutUpdate<'_>| {
            println!(
                "layout: items={} height={} width={}",
                u.computed_styles.len(),
                u.height,
                u.width
            );
        }));
    let stream = Stream::new("photos", (0..10u32).collect());
    let mut g = Gallery::new(options, stream, MeasurementCache::with_container_width(960))
        .expect("valid options");

    let _ = g.mount().expect("container is measured");
    println!("columns={} width={}", g.columns(), g.width());

    let mut next_id = 10u32;
    for page in 0..3 {
        // The host renders the open batch; each item reports its height once drawn.
        for i in 0..g.total_elements() {
            if g.is_awaiting_acknowledgement(i) {
                g.measure_mut().set_height(i, 120 + (i as u32 * 37) % 180);
                let _ = g.on_item_ready(i).expect("rendered item");
            }
        }

        // The reader scrolls to the bottom row.
        let last = g.total_elements() - 1;
        let effects = g.on_visible(&[last]).expect("rendered item");
        println!(
            "page={page} phase={:?} total={} heights={:?}",
            g.phase(),
            g.total_elements(),
            g.column_heights()
        );

        if effects.request_next_batch {
            let items: Vec<u32> = (next_id..next_id + 5).collect();
            next_id += 5;
            let _ = g
                .receive_batch(BatchOutcome::Loaded {
                    items,
                    exhausted: page == 2,
                })
                .expect("stream only grows");
        }
    }

    g.on_resize(480, 800, 0);
    let effects = g.tick(500).expect("mounted");
    println!(
        "after resize: columns={} height={} scroll_to={:?}",
        g.columns(),
        g.height(),
        effects.scroll_to
    );
}
