use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

fn options(batch: usize) -> GalleryOptions {
    GalleryOptions::new()
        .with_load_batch_size(batch)
        .with_column_width(300)
        .with_margins(0, 0)
}

fn gallery(len: usize, batch: usize, width: u32) -> Gallery<u32, u32> {
    let stream = Stream::new(1, (0..len as u32).collect());
    Gallery::new(
        options(batch),
        stream,
        MeasurementCache::with_container_width(width),
    )
    .unwrap()
}

/// Acknowledges every item of the open batch, returning the effects of the last one.
fn settle(g: &mut Gallery<u32, u32>) -> Effects {
    let pending: Vec<usize> = (0..g.total_elements())
        .filter(|&i| g.is_awaiting_acknowledgement(i))
        .collect();
    let mut effects = Effects::default();
    for index in pending {
        effects = g.on_item_ready(index).unwrap();
    }
    effects
}

fn uniform_heights(len: usize, height: u32, width: u32) -> MeasurementCache {
    let mut m = MeasurementCache::with_container_width(width);
    m.set_heights((0..len).map(|i| (i, height)));
    m
}

fn column_of(style: &ElementStyle, geometry: Geometry, column_margin: u32) -> usize {
    (0..geometry.columns)
        .find(|&c| {
            let left = c as u32 * geometry.column_width + if c == 0 { 0 } else { column_margin };
            left == style.left
        })
        .unwrap()
}

#[test]
fn geometry_rounds_and_clamps_columns() {
    let g = Geometry::for_container(1000, 300, 8);
    assert_eq!(g.columns, 3);
    assert_eq!(g.column_width, 333);

    // 2.5 rounds half up.
    let g = Geometry::for_container(750, 300, 8);
    assert_eq!(g.columns, 3);
    assert_eq!(g.column_width, 250);

    let g = Geometry::for_container(5000, 300, 8);
    assert_eq!(g.columns, 8);
    assert_eq!(g.column_width, 625);

    // Narrower than half a column still lays out in one column.
    let g = Geometry::for_container(100, 300, 8);
    assert_eq!(g.columns, 1);
    assert_eq!(g.column_width, 100);
}

#[test]
fn column_heights_shortest_matches_linear_scan() {
    let mut rng = Lcg::new(7);
    for _ in 0..200 {
        let columns = rng.gen_range_usize(1, 12);
        let mut heights = ColumnHeights::new(columns);
        let mut expected = alloc::vec![0u64; columns];
        for _ in 0..40 {
            let c = rng.gen_range_usize(0, columns);
            let h = rng.gen_range_u64(0, 6) * 50;
            heights.set(c, h);
            expected[c] = h;

            let min = *expected.iter().min().unwrap();
            let first_min = expected.iter().position(|&v| v == min).unwrap();
            assert_eq!(heights.shortest(), Some(first_min));
            assert_eq!(heights.as_slice(), expected.as_slice());
        }
    }
}

#[test]
fn column_heights_ties_prefer_lowest_index() {
    let mut heights = ColumnHeights::new(4);
    assert_eq!(heights.shortest(), Some(0));
    heights.set(0, 10);
    assert_eq!(heights.shortest(), Some(1));
    heights.set(1, 10);
    heights.set(2, 10);
    heights.set(3, 10);
    assert_eq!(heights.shortest(), Some(0));
    heights.set(2, 5);
    assert_eq!(heights.shortest(), Some(2));
    assert_eq!(heights.max(), 10);
    assert_eq!(heights.min(), 5);
}

#[test]
fn layout_length_and_height_match_columns() {
    let mut rng = Lcg::new(42);
    for _ in 0..100 {
        let len = rng.gen_range_usize(0, 80);
        let end = rng.gen_range_usize(0, 100);
        let width = rng.gen_range_u32(100, 3000);
        let mut m = MeasurementCache::with_container_width(width);
        for i in 0..len {
            if rng.gen_range_u32(0, 3) > 0 {
                m.set_height(i, rng.gen_range_u32(20, 400));
            }
        }
        let opts = GalleryOptions::new().with_strict_order(rng.gen_range_u32(0, 2) == 1);
        let geometry = Geometry::for_container(width, opts.column_width, opts.max_columns);

        let out = layout(
            &opts,
            geometry,
            LayoutRequest {
                end,
                stream_len: len,
                prior: &[],
                visibility: Visibility::Hidden,
                recompute: Recompute::Reuse,
            },
            &m,
        );
        assert_eq!(out.styles.len(), end.min(len));
        assert_eq!(out.height, out.column_heights.max());
        assert_eq!(out.column_heights.len(), geometry.columns);
    }
}

#[test]
fn uniform_items_fill_two_columns_evenly() {
    let opts = options(25);
    let m = uniform_heights(8, 100, 600);
    let geometry = Geometry::for_container(600, 300, 8);
    assert_eq!(geometry.columns, 2);

    let out = layout(
        &opts,
        geometry,
        LayoutRequest {
            end: 8,
            stream_len: 8,
            prior: &[],
            visibility: Visibility::Visible,
            recompute: Recompute::Full,
        },
        &m,
    );
    assert_eq!(out.column_heights.as_slice(), &[400, 400]);
    assert_eq!(out.height, 400);

    // Row margins separate stacked items, never the first one.
    let opts = opts.with_margins(0, 5);
    let out = layout(
        &opts,
        geometry,
        LayoutRequest {
            end: 8,
            stream_len: 8,
            prior: &[],
            visibility: Visibility::Visible,
            recompute: Recompute::Full,
        },
        &m,
    );
    assert_eq!(out.column_heights.as_slice(), &[415, 415]);
    assert_eq!(out.styles[0].top, 0);
    assert_eq!(out.styles[2].top, 105);
}

#[test]
fn edge_and_interior_column_geometry() {
    let opts = options(25).with_margins(10, 0);
    let m = uniform_heights(3, 50, 900);
    let geometry = Geometry::for_container(900, 300, 8);
    let out = layout(
        &opts,
        geometry,
        LayoutRequest {
            end: 3,
            stream_len: 3,
            prior: &[],
            visibility: Visibility::Visible,
            recompute: Recompute::Full,
        },
        &m,
    );
    let s = &out.styles;
    assert_eq!((s[0].left, s[0].width), (0, 300));
    assert_eq!((s[1].left, s[1].width), (310, 290));
    assert_eq!((s[2].left, s[2].width), (610, 300));
    assert!(s.iter().all(|s| s.height == Some(50)));
}

#[test]
fn unmeasured_items_pack_with_default_height_but_keep_no_height() {
    let opts = options(25).with_default_child_height(120);
    let mut m = MeasurementCache::with_container_width(300);
    m.set_height(1, 40);
    let geometry = Geometry::for_container(300, 300, 8);
    let out = layout(
        &opts,
        geometry,
        LayoutRequest {
            end: 3,
            stream_len: 3,
            prior: &[],
            visibility: Visibility::Hidden,
            recompute: Recompute::Reuse,
        },
        &m,
    );
    assert_eq!(out.styles[0].height, None);
    assert_eq!(out.styles[1].top, 120);
    assert_eq!(out.styles[1].height, Some(40));
    assert_eq!(out.styles[2].top, 160);
    assert_eq!(out.height, 280);
}

#[test]
fn reuse_layout_is_idempotent() {
    let mut rng = Lcg::new(3);
    let opts = options(5).with_margins(5, 5);
    let mut m = MeasurementCache::with_container_width(1280);
    for i in 0..60 {
        m.set_height(i, rng.gen_range_u32(50, 500));
    }
    let geometry = Geometry::for_container(1280, opts.column_width, opts.max_columns);
    let prior = layout(
        &opts,
        geometry,
        LayoutRequest {
            end: 40,
            stream_len: 60,
            prior: &[],
            visibility: Visibility::Visible,
            recompute: Recompute::Full,
        },
        &m,
    )
    .styles;

    let request = LayoutRequest {
        end: 60,
        stream_len: 60,
        prior: &prior,
        visibility: Visibility::Hidden,
        recompute: Recompute::Reuse,
    };
    let a = layout(&opts, geometry, request, &m);
    let b = layout(&opts, geometry, request, &m);
    assert_eq!(a, b);
}

#[test]
fn greedy_placement_keeps_columns_within_one_item() {
    let mut rng = Lcg::new(11);
    for _ in 0..100 {
        let len = rng.gen_range_usize(1, 200);
        let width = rng.gen_range_u32(300, 2700);
        let m = uniform_heights(len, 100, width);
        let opts = options(25);
        let geometry = Geometry::for_container(width, opts.column_width, opts.max_columns);
        let out = layout(
            &opts,
            geometry,
            LayoutRequest {
                end: len,
                stream_len: len,
                prior: &[],
                visibility: Visibility::Visible,
                recompute: Recompute::Full,
            },
            &m,
        );
        let spread = out.column_heights.max() - out.column_heights.min();
        assert!(spread <= 100, "spread={spread} len={len} cols={}", geometry.columns);
    }
}

#[test]
fn strict_order_round_robins_regardless_of_heights() {
    let mut rng = Lcg::new(5);
    let opts = options(25).with_strict_order(true).with_margins(7, 3);
    let mut m = MeasurementCache::with_container_width(900);
    for i in 0..50 {
        m.set_height(i, rng.gen_range_u32(10, 900));
    }
    let geometry = Geometry::for_container(900, opts.column_width, opts.max_columns);
    let out = layout(
        &opts,
        geometry,
        LayoutRequest {
            end: 50,
            stream_len: 50,
            prior: &[],
            visibility: Visibility::Visible,
            recompute: Recompute::Full,
        },
        &m,
    );
    for (i, style) in out.styles.iter().enumerate() {
        assert_eq!(column_of(style, geometry, opts.column_margin), i % 3);
    }
}

#[test]
fn recompute_policies_control_visibility() {
    let opts = options(2);
    let m = MeasurementCache::with_container_width(600);
    let geometry = Geometry::for_container(600, 300, 8);
    let prior = alloc::vec![ElementStyle::default(); 6];
    let run = |recompute| {
        layout(
            &opts,
            geometry,
            LayoutRequest {
                end: 8,
                stream_len: 8,
                prior: &prior,
                visibility: Visibility::Visible,
                recompute,
            },
            &m,
        )
        .styles
        .iter()
        .map(|s| s.is_visible())
        .collect::<Vec<_>>()
    };

    assert_eq!(run(Recompute::Full), [true; 8]);
    assert_eq!(
        run(Recompute::New),
        [false, false, false, false, true, true, true, true]
    );
    assert_eq!(
        run(Recompute::Reuse),
        [false, false, false, false, false, false, true, true]
    );
}

#[test]
fn invalid_config_is_rejected() {
    let stream = Stream::new(0u32, Vec::<u32>::new());
    let err = Gallery::new(
        GalleryOptions::new().with_load_batch_size(0),
        stream.clone(),
        MeasurementCache::new(),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::LoadBatchSize(0));

    let err = Gallery::new(
        GalleryOptions::new().with_max_columns(0),
        stream,
        MeasurementCache::new(),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::MaxColumns(0));

    let mut g = gallery(4, 2, 600);
    g.mount().unwrap();
    let err = g
        .update_options(|o| o.column_width = 0)
        .unwrap_err();
    assert_eq!(err, GalleryError::Config(ConfigError::ColumnWidth(0)));
    assert_eq!(g.options().column_width, 300);
}

#[test]
fn mount_without_container_fails() {
    let mut g: Gallery<u32, u32> =
        Gallery::new(options(4), Stream::new(1, alloc::vec![1, 2]), MeasurementCache::new())
            .unwrap();
    assert_eq!(g.mount().unwrap_err(), GalleryError::ContainerUnavailable);
    assert!(!g.is_mounted());
    assert_eq!(g.total_elements(), 0);
}

#[test]
fn initial_batch_is_hidden_until_every_item_acknowledges() {
    let layouts = Arc::new(AtomicUsize::new(0));
    let last_height = Arc::new(AtomicU64::new(0));
    let opts = options(4).with_on_layout(Some({
        let layouts = Arc::clone(&layouts);
        let last_height = Arc::clone(&last_height);
        move |u: &LayoutUpdate<'_>| {
            layouts.fetch_add(1, Ordering::Relaxed);
            last_height.store(u.height, Ordering::Relaxed);
            assert_eq!(u.width, 600);
            assert_eq!(u.computed_styles.len(), 4);
        }
    }));
    let mut g: Gallery<u32, u32> = Gallery::new(
        opts,
        Stream::new(1, (0..10).collect()),
        MeasurementCache::with_container_width(600),
    )
    .unwrap();

    let effects = g.mount().unwrap();
    assert!(effects.is_empty());
    assert_eq!(g.phase(), BatchPhase::InitialLoad);
    assert_eq!(g.total_elements(), 4);
    assert!(g.is_loading());
    assert_eq!(g.pending_acknowledgements(), 4);
    assert!(g.computed_styles().iter().all(|s| !s.is_visible()));

    for i in 0..3 {
        g.measure_mut().set_height(i, 100);
        assert!(g.on_item_ready(i).unwrap().is_empty());
        assert!(g.is_loading());
    }
    // A second acknowledgement of the same item does not count.
    assert!(g.on_item_ready(0).unwrap().is_empty());
    assert_eq!(g.pending_acknowledgements(), 1);
    assert_eq!(layouts.load(Ordering::Relaxed), 0);

    g.measure_mut().set_height(3, 100);
    let effects = g.on_item_ready(3).unwrap();
    assert!(effects.layout_complete);
    assert!(!g.is_loading());
    assert_eq!(g.phase(), BatchPhase::Idle);
    assert!(g.computed_styles().iter().all(|s| s.is_visible()));
    assert_eq!(g.column_heights(), &[200, 200]);
    assert_eq!(layouts.load(Ordering::Relaxed), 1);
    assert_eq!(last_height.load(Ordering::Relaxed), 200);
    assert_eq!(g.state().computed_styles.len(), g.state().total_elements);
}

#[test]
fn bottom_row_visibility_extends_the_window() {
    let mut g = gallery(10, 4, 600);
    g.mount().unwrap();

    // Ignored while the initial batch is settling.
    assert!(g.on_visible(&[3]).unwrap().is_empty());
    assert_eq!(g.total_elements(), 4);
    let _ = settle(&mut g);

    // Item 3 was viewed while loading, so any later signal finds the bottom row viewed.
    let effects = g.on_visible(&[0]).unwrap();
    assert!(effects.is_empty());
    assert_eq!(g.phase(), BatchPhase::Extending);
    assert_eq!(g.total_elements(), 8);
    assert_eq!(g.viewed_count(), 4);
    assert!(!g.all_elements_viewed());

    // New items start hidden; old ones keep their visibility.
    let visible: Vec<bool> = g.computed_styles().iter().map(|s| s.is_visible()).collect();
    assert_eq!(visible, [true, true, true, true, false, false, false, false]);
    let _ = settle(&mut g);

    assert!(g.on_visible(&[4]).unwrap().is_empty());
    assert_eq!(g.total_elements(), 8, "interior row must not extend");
    assert!(g.on_visible(&[7]).unwrap().is_empty());
    assert_eq!(g.total_elements(), 10);
    assert_eq!(g.pending_acknowledgements(), 2);
}

#[test]
fn viewing_everything_requests_upstream_exactly_once() {
    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);

    let effects = g.on_visible(&[3]).unwrap();
    assert!(effects.request_next_batch);
    assert!(g.waiting_on_next_batch());
    assert_eq!(g.phase(), BatchPhase::AwaitingUpstream);

    for _ in 0..5 {
        let effects = g.on_visible(&[2]).unwrap();
        assert!(!effects.request_next_batch);
    }
    assert!(!g.set_external_loading(false).unwrap().request_next_batch);

    let effects = g
        .receive_batch(BatchOutcome::Loaded {
            items: alloc::vec![4, 5, 6],
            exhausted: false,
        })
        .unwrap();
    assert!(effects.is_empty());
    assert!(!g.waiting_on_next_batch());
    assert_eq!(g.phase(), BatchPhase::Extending);
    assert_eq!(g.total_elements(), 7);
}

#[test]
fn random_event_sequences_never_double_request() {
    let mut rng = Lcg::new(99);
    for round in 0..20 {
        let mut g = gallery(rng.gen_range_usize(1, 30), rng.gen_range_usize(1, 8), 900);
        g.mount().unwrap();
        let mut next_item = 1000u32;
        let mut outstanding = false;
        for step in 0..300u64 {
            let effects = match rng.gen_range_u32(0, 6) {
                0 | 1 if g.total_elements() > 0 => {
                    let i = rng.gen_range_usize(0, g.total_elements());
                    g.on_visible(&[i]).unwrap()
                }
                2 if g.total_elements() > 0 => {
                    let i = rng.gen_range_usize(0, g.total_elements());
                    g.on_item_ready(i).unwrap()
                }
                3 => {
                    g.on_resize(rng.gen_range_u32(300, 2400), 800, step * 100);
                    g.tick(step * 100).unwrap()
                }
                4 if g.waiting_on_next_batch() => {
                    outstanding = false;
                    let n = rng.gen_range_usize(0, 5);
                    let items: Vec<u32> = (0..n as u32).map(|k| next_item + k).collect();
                    next_item += n as u32;
                    g.receive_batch(BatchOutcome::Loaded {
                        items,
                        exhausted: rng.gen_range_u32(0, 4) == 0,
                    })
                    .unwrap()
                }
                _ => settle(&mut g),
            };
            if effects.request_next_batch {
                assert!(!outstanding, "round {round} step {step}: double request");
                outstanding = true;
            }
            assert_eq!(outstanding, g.waiting_on_next_batch(), "round {round} step {step}");
            assert_eq!(g.computed_styles().len(), g.total_elements());
            assert!(g.total_elements() <= g.stream().len());
            assert_eq!(g.height(), g.column_heights().iter().copied().max().unwrap_or(0));
            if g.pending_acknowledgements() > 0 {
                assert!(g.is_loading());
            }
        }
    }
}

#[test]
fn key_change_while_loading_resets_before_any_request() {
    let mut g = gallery(10, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    let _ = g.on_visible(&[3]).unwrap();
    assert_eq!(g.total_elements(), 8);

    assert!(g.set_external_loading(true).unwrap().is_empty());
    let effects = g.set_stream(Stream::new(2, (100..103).collect())).unwrap();
    assert!(effects.is_empty());
    assert_eq!(g.state(), &GalleryState::default());
    assert_eq!(g.phase(), BatchPhase::Reset);
    assert_eq!(g.pending_acknowledgements(), 0);
    assert!(!g.waiting_on_next_batch());

    let _ = g.set_external_loading(false).unwrap();
    assert_eq!(g.phase(), BatchPhase::InitialLoad);
    assert_eq!(g.total_elements(), 3);
    assert_eq!(g.item(0).unwrap().0, &100);
}

#[test]
fn key_change_when_idle_starts_over_immediately() {
    let mut g = gallery(10, 4, 600);
    g.mount().unwrap();
    // Switch sources mid-batch: the open batch is dropped with the old stream.
    let _ = g.set_stream(Stream::new(7, (50..60).collect())).unwrap();
    assert_eq!(g.phase(), BatchPhase::InitialLoad);
    assert_eq!(g.total_elements(), 4);
    assert_eq!(g.pending_acknowledgements(), 4);
    assert_eq!(g.viewed_count(), 0);
    assert!(settle(&mut g).layout_complete);
}

#[test]
fn exhausted_upstream_ends_in_all_viewed() {
    let view = |g: &mut Gallery<u32, u32>, i: usize| g.on_visible(&[i]).unwrap();

    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    assert!(view(&mut g, 3).request_next_batch);

    let _ = g
        .receive_batch(BatchOutcome::Loaded {
            items: Vec::new(),
            exhausted: true,
        })
        .unwrap();
    assert_eq!(g.phase(), BatchPhase::AllViewed);
    assert!(g.all_elements_viewed());
    assert!(g.max_data_reached());
    for i in 0..4 {
        assert!(!view(&mut g, i).request_next_batch);
    }
    assert_eq!(g.phase(), BatchPhase::AllViewed);

    // The last batch may still carry items; they are shown before the gallery ends.
    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    assert!(view(&mut g, 3).request_next_batch);
    let _ = g
        .receive_batch(BatchOutcome::Loaded {
            items: alloc::vec![4, 5],
            exhausted: true,
        })
        .unwrap();
    assert_eq!(g.total_elements(), 6);
    let _ = settle(&mut g);
    assert!(!view(&mut g, 5).request_next_batch);
    assert_eq!(g.phase(), BatchPhase::AllViewed);
}

#[test]
fn empty_page_before_exhaustion_asks_again() {
    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    assert!(g.on_visible(&[3]).unwrap().request_next_batch);

    let effects = g
        .receive_batch(BatchOutcome::Loaded {
            items: Vec::new(),
            exhausted: false,
        })
        .unwrap();
    assert!(effects.request_next_batch);
    assert!(g.waiting_on_next_batch());
    assert_eq!(g.phase(), BatchPhase::AwaitingUpstream);
    assert!(!g.all_elements_viewed());

    // Still exactly one request outstanding: visibility does not add another.
    assert!(!g.on_visible(&[2]).unwrap().request_next_batch);

    let _ = g
        .receive_batch(BatchOutcome::Loaded {
            items: alloc::vec![4],
            exhausted: false,
        })
        .unwrap();
    assert!(!g.waiting_on_next_batch());
    assert_eq!(g.total_elements(), 5);
}

#[test]
fn unsolicited_batch_does_not_request() {
    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    let effects = g
        .receive_batch(BatchOutcome::Loaded {
            items: Vec::new(),
            exhausted: false,
        })
        .unwrap();
    assert!(effects.is_empty());
    assert_eq!(g.phase(), BatchPhase::Idle);
}

#[test]
fn key_change_to_an_empty_stream_settles_idle() {
    let mut g = gallery(10, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);

    let _ = g.set_stream(Stream::new(2, Vec::new())).unwrap();
    assert_eq!(g.phase(), BatchPhase::Idle);
    assert_eq!(g.total_elements(), 0);

    // Reset only persists while the host is busy.
    let _ = g.set_external_loading(true).unwrap();
    let _ = g.set_stream(Stream::new(3, Vec::new())).unwrap();
    assert_eq!(g.phase(), BatchPhase::Reset);
    let _ = g.set_external_loading(false).unwrap();
    assert_eq!(g.phase(), BatchPhase::Idle);

    let _ = g.extend_stream([7, 8]).unwrap();
    assert_eq!(g.phase(), BatchPhase::InitialLoad);
    assert_eq!(g.total_elements(), 2);
}

#[test]
fn upstream_failure_is_treated_as_exhaustion() {
    let mut g = gallery(2, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    assert!(g.on_visible(&[1]).unwrap().request_next_batch);
    let _ = g.receive_batch(BatchOutcome::Failed).unwrap();
    assert!(g.max_data_reached());
    assert_eq!(g.phase(), BatchPhase::AllViewed);
    assert!(!g.on_visible(&[0]).unwrap().request_next_batch);
}

#[test]
fn without_upstream_viewing_everything_ends_the_gallery() {
    let mut g = gallery(2, 4, 600);
    g.set_has_upstream(false);
    g.mount().unwrap();
    let _ = settle(&mut g);
    assert!(!g.on_visible(&[1]).unwrap().request_next_batch);
    assert_eq!(g.phase(), BatchPhase::AllViewed);
    assert!(g.all_elements_viewed());
}

#[test]
fn resize_burst_relayouts_once_with_final_width() {
    let mut g = gallery(8, 8, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    assert_eq!(g.columns(), 2);
    let before = g.computed_styles().to_vec();

    g.on_resize(900, 1000, 0);
    g.on_resize(1200, 1000, 200);
    assert_eq!(g.next_resize_due_ms(), Some(700));

    assert!(g.tick(600).unwrap().is_empty());
    assert_eq!(g.columns(), 2);
    assert_eq!(g.computed_styles(), before.as_slice());

    let _ = g.tick(700).unwrap();
    assert_eq!(g.columns(), 4);
    assert_eq!(g.width(), 1200);
    assert!(!g.resize_pending());
    assert!(!g.is_loading());
    assert!(g.computed_styles().iter().all(|s| s.is_visible()));

    let after = g.computed_styles().to_vec();
    assert!(g.tick(5000).unwrap().is_empty());
    assert_eq!(g.computed_styles(), after.as_slice());
}

#[test]
fn resize_rescales_scroll_position() {
    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    assert_eq!(g.height(), 600);

    g.measure_mut().set_scroll_offset(300);
    g.on_resize(1200, 300, 0);
    let effects = g.tick(500).unwrap();
    assert_eq!(effects.scroll_to, Some(600));

    let _ = g.update_options(|o| o.adjust_scroll = false).unwrap();
    g.on_resize(600, 300, 1000);
    assert_eq!(g.tick(1500).unwrap().scroll_to, None);
    assert_eq!(g.columns(), 2);
}

#[test]
fn resize_with_same_width_is_ignored() {
    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    g.measure_mut().set_scroll_offset(100);
    g.on_resize(600, 900, 0);
    assert!(g.tick(500).unwrap().is_empty());
}

#[test]
fn resize_during_open_batch_keeps_it_open() {
    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    g.on_resize(1200, 800, 0);
    let _ = g.tick(500).unwrap();
    assert_eq!(g.columns(), 4);
    assert!(g.is_loading());
    assert_eq!(g.pending_acknowledgements(), 4);
    assert!(settle(&mut g).layout_complete);
    assert!(!g.is_loading());
}

#[test]
fn unmount_cancels_pending_resize() {
    let mut g = gallery(4, 4, 600);
    g.mount().unwrap();
    let _ = settle(&mut g);
    g.on_resize(1200, 800, 0);
    g.unmount();
    assert!(!g.resize_pending());
    assert!(g.tick(10_000).unwrap().is_empty());
    assert_eq!(g.columns(), 2);

    // Signals after teardown are dropped.
    g.on_resize(1200, 800, 20_000);
    assert!(!g.resize_pending());
    assert!(g.on_visible(&[3]).unwrap().is_empty());
}

#[test]
fn layout_option_change_relayouts_everything() {
    let mut g = gallery(6, 6, 900);
    g.mount().unwrap();
    let _ = settle(&mut g);
    assert_eq!(g.columns(), 3);

    let _ = g.update_options(|o| o.strict_order = true).unwrap();
    let geometry = g.geometry();
    for (i, style) in g.computed_styles().iter().enumerate() {
        assert_eq!(column_of(style, geometry, 0), i % 3);
        assert!(style.is_visible());
    }

    let _ = g.update_options(|o| o.max_columns = 2).unwrap();
    assert_eq!(g.columns(), 2);
}

#[test]
fn signals_for_unrendered_items_are_errors() {
    let mut g = gallery(10, 4, 600);
    g.mount().unwrap();
    assert_eq!(
        g.on_visible(&[1, 4]).unwrap_err(),
        GalleryError::IndexOutOfRange { index: 4, len: 4 }
    );
    // The valid index of a rejected event is not marked.
    assert!(!g.is_viewed(1));
    assert_eq!(
        g.on_item_ready(9).unwrap_err(),
        GalleryError::IndexOutOfRange { index: 9, len: 4 }
    );
    assert!(g.item(4).is_err());
}

#[test]
fn shrinking_the_stream_is_rejected() {
    let mut g = gallery(10, 4, 600);
    g.mount().unwrap();
    let err = g.set_stream(Stream::new(1, alloc::vec![0, 1])).unwrap_err();
    assert_eq!(err, GalleryError::StreamInvalid { index: 2, len: 2 });
    assert_eq!(g.stream().len(), 10);

    let mut seen = Vec::new();
    g.for_each_item(|i, item, _| seen.push((i, *item))).unwrap();
    assert_eq!(seen, [(0, 0), (1, 1), (2, 2), (3, 3)]);
}

#[test]
fn data_arrival_before_mount_waits_for_the_container() {
    let mut g = gallery(0, 4, 600);
    assert!(g.extend_stream([1, 2, 3]).unwrap().is_empty());
    assert_eq!(g.total_elements(), 0);
    g.mount().unwrap();
    assert_eq!(g.total_elements(), 3);
    assert_eq!(g.phase(), BatchPhase::InitialLoad);
}

#[test]
fn reobserve_reports_unviewed_items_once() {
    let mut g = gallery(10, 4, 600);
    g.mount().unwrap();

    let mut observed = Vec::new();
    g.reobserve(|i| observed.push(i));
    assert!(observed.is_empty(), "no observation while loading");

    let _ = settle(&mut g);
    g.reobserve(|i| observed.push(i));
    assert_eq!(observed, [0, 1, 2, 3]);
    assert!(g.is_observed(2));

    let _ = g.on_visible(&[0]).unwrap();
    assert!(!g.is_observed(0));
    assert!(g.is_viewed(0));

    observed.clear();
    g.reobserve(|i| observed.push(i));
    assert!(observed.is_empty());
}

#[test]
fn decide_follows_the_batch_rule() {
    let base = BatchSnapshot {
        mounted: true,
        loading: false,
        stream_len: 10,
        total_elements: 4,
        waiting_on_next_batch: false,
        max_data_reached: false,
        has_upstream: true,
        load_batch_size: 4,
    };

    assert_eq!(
        decide(&BatchSnapshot { loading: true, ..base }, Some(4)),
        Decision::Nothing
    );
    assert_eq!(
        decide(&BatchSnapshot { stream_len: 0, total_elements: 0, ..base }, None),
        Decision::Nothing
    );
    assert_eq!(
        decide(&BatchSnapshot { total_elements: 0, ..base }, None),
        Decision::InitialLoad { end: 4 }
    );
    assert_eq!(decide(&base, None), Decision::Nothing);
    assert_eq!(decide(&base, Some(4)), Decision::Extend { end: 8 });
    assert_eq!(
        decide(&BatchSnapshot { total_elements: 10, ..base }, Some(10)),
        Decision::RequestUpstream
    );
    assert_eq!(
        decide(
            &BatchSnapshot {
                total_elements: 10,
                max_data_reached: true,
                ..base
            },
            Some(10)
        ),
        Decision::AllViewed
    );
    assert_eq!(
        decide(
            &BatchSnapshot {
                total_elements: 10,
                has_upstream: false,
                ..base
            },
            Some(10)
        ),
        Decision::AllViewed
    );
    // Awaiting upstream: only new data may grow the window.
    let waiting = BatchSnapshot {
        total_elements: 10,
        waiting_on_next_batch: true,
        ..base
    };
    assert_eq!(decide(&waiting, Some(10)), Decision::Nothing);
    assert_eq!(
        decide(&BatchSnapshot { stream_len: 13, ..waiting }, None),
        Decision::Extend { end: 14 }
    );
}
