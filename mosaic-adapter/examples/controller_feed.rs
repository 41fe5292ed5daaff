use std::collections::VecDeque;

use mosaic::{Gallery, GalleryOptions, MeasurementCache, Stream};
use mosaic_adapter::{Batch, BatchSource, BatchTicket, Controller, GalleryEvent};

/// A fake paginated API: requests are answered on the next frame.
#[derive(Default)]
struct Api {
    requests: VecDeque<(BatchTicket, u32)>,
}

impl BatchSource<u32> for Api {
    type Cursor = u32;

    fn request_next(&mut self, ticket: BatchTicket, cursor: Option<&u32>) {
        self.requests.push_back((ticket, cursor.copied().unwrap_or(8)));
    }
}

fn main() {
    // Example: a frame loop that pushes host signals, pumps the controller and applies the frame.
    //
    // An adapter would:
    // - translate DOM/UI callbacks into `GalleryEvent`s
    // - call pump(now_ms) once per frame
    // - apply styles, (un)observe items and honor scroll_to
    let gallery = Gallery::new(
        GalleryOptions::new().with_load_batch_size(4),
        Stream::new(0u8, (0..8u32).collect()),
        MeasurementCache::with_container_width(1200),
    )
    .expect("valid options");
    let mut c = Controller::new(gallery, Api::default());
    let _ = c.attach().expect("container is measured");

    let mut now_ms = 0u64;
    while now_ms < 2_000 {
        now_ms += 16;

        let pending: Vec<usize> = (0..c.gallery().total_elements())
            .filter(|&i| c.gallery().is_awaiting_acknowledgement(i))
            .collect();
        for i in pending {
            c.gallery_mut().measure_mut().set_height(i, 200 + (i as u32 % 3) * 50);
            c.push(GalleryEvent::ItemReady(i));
        }

        if let Some((ticket, start)) = c.source_mut().requests.pop_front() {
            let items: Vec<u32> = (start..start + 4).collect();
            let next_cursor = (start < 20).then_some(start + 4);
            c.push(GalleryEvent::BatchLoaded {
                ticket,
                result: Ok(Batch::new(items, next_cursor)),
            });
        }

        let frame = c.pump(now_ms).expect("valid events");
        // Pretend the bottom row is always on screen.
        if let Some(&last) = frame.observe.last() {
            c.push(GalleryEvent::Visible(vec![last]));
        }
        if frame.layout_complete || frame.requested_batch.is_some() {
            println!(
                "t={now_ms} total={} phase={:?} requested={:?}",
                c.gallery().total_elements(),
                c.gallery().phase(),
                frame.requested_batch
            );
        }
    }

    c.detach();
    println!("done: {:?}", c);
}
