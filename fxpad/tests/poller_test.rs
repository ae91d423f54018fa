pub mod common;

mod poller_test {
    use core::cell::RefCell;

    use embassy_time::{Duration, Instant};
    use fxpad::channel::MACRO_EVENT_CHANNEL;
    use fxpad::config::FeedConfig;
    use fxpad::event::{LinkState, MacroEvent};
    use fxpad::poller::{link_state, DueWork, FeedPoller};
    use fxpad::queue::CommandQueue;
    use rusty_fork::rusty_fork_test;

    use crate::common::*;

    fn feed_poller<'a, const N: usize>(
        feed: &MockFeed,
        queue: &'a RefCell<CommandQueue<N>>,
    ) -> FeedPoller<'a, MockFeed, N> {
        FeedPoller::new(
            feed.clone(),
            queue,
            FeedConfig::default(),
            MACRO_EVENT_CHANNEL.publisher().unwrap(),
        )
    }

    rusty_fork_test! {

        #[test]
        fn test_connect_then_poll_enqueues_in_order() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut sub = MACRO_EVENT_CHANNEL.subscriber().unwrap();
            let mut poller = feed_poller(&feed, &queue);

            run_test(async {
                poller.connect().await;
                assert_eq!(poller.state(), LinkState::Polling);
                assert_eq!(link_state(), LinkState::Polling);

                feed.push("foo");
                feed.push("bar");
                poller.service(DueWork::Poll).await;
            });

            let mut pending = queue.borrow_mut();
            assert_eq!(pending.dequeue().unwrap().label.as_str(), "foo");
            assert_eq!(pending.dequeue().unwrap().label.as_str(), "bar");
            assert!(pending.is_empty());
            assert_eq!(feed.acks().len(), 2);
            assert_eq!(feed.pending_len(), 0);

            assert_eq!(
                link_transitions(&drain_events(&mut sub)),
                vec![
                    LinkState::Connecting,
                    LinkState::Polling,
                    LinkState::Draining,
                    LinkState::Polling,
                ]
            );
        }

        #[test]
        fn test_failed_connect_leaves_local_operation_intact() {
            let feed = MockFeed::new();
            feed.state().borrow_mut().fail_connects = 1;
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut sub = MACRO_EVENT_CHANNEL.subscriber().unwrap();
            let mut poller = feed_poller(&feed, &queue);

            run_test(async {
                poller.connect().await;
                assert_eq!(poller.state(), LinkState::Disconnected);
                assert_eq!(link_state(), LinkState::Disconnected);

                // The next health check picks the link back up.
                poller.service(DueWork::HealthCheck).await;
                assert_eq!(poller.state(), LinkState::Polling);
            });

            assert_eq!(feed.state().borrow().connect_calls, 2);
            assert_eq!(
                link_transitions(&drain_events(&mut sub)),
                vec![
                    LinkState::Connecting,
                    LinkState::Disconnected,
                    LinkState::Reconnecting,
                    LinkState::Polling,
                ]
            );
        }

        #[test]
        fn test_unhealthy_link_reconnects_and_resumes() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut sub = MACRO_EVENT_CHANNEL.subscriber().unwrap();
            let mut poller = feed_poller(&feed, &queue);

            run_test(async {
                poller.connect().await;

                // Queued on the source while the link goes bad: it must
                // survive the reconnect, not get drained as backlog.
                feed.push("later");
                feed.state().borrow_mut().unhealthy_reports = 1;

                poller.service(DueWork::HealthCheck).await;
                assert_eq!(poller.state(), LinkState::Polling);

                poller.service(DueWork::Poll).await;
            });

            assert_eq!(feed.state().borrow().connect_calls, 2);
            assert_eq!(feed.state().borrow().health_calls, 1);
            assert_eq!(queue.borrow_mut().dequeue().unwrap().label.as_str(), "later");
            assert_eq!(feed.acks().len(), 1);

            assert_eq!(
                link_transitions(&drain_events(&mut sub)),
                vec![
                    LinkState::Connecting,
                    LinkState::Polling,
                    LinkState::Reconnecting,
                    LinkState::Polling,
                    LinkState::Draining,
                    LinkState::Polling,
                ]
            );
        }

        #[test]
        fn test_healthy_link_stays_put() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut poller = feed_poller(&feed, &queue);

            run_test(async {
                poller.connect().await;
                poller.service(DueWork::HealthCheck).await;
            });

            assert_eq!(poller.state(), LinkState::Polling);
            assert_eq!(feed.state().borrow().health_calls, 1);
            assert_eq!(feed.state().borrow().connect_calls, 1);
        }

        #[test]
        fn test_retry_cycle_fixed_delays_then_parks() {
            let feed = MockFeed::new();
            feed.state().borrow_mut().fail_connects = 3;
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut sub = MACRO_EVENT_CHANNEL.subscriber().unwrap();
            let mut poller = feed_poller(&feed, &queue);

            run_test(async {
                let start = Instant::now();
                poller.service(DueWork::HealthCheck).await;

                // Three attempts with a fixed 2 s pause after the first
                // two failures, nothing longer.
                assert_eq!(Instant::now() - start, Duration::from_secs(4));
                assert_eq!(poller.state(), LinkState::Disconnected);
                assert_eq!(feed.state().borrow().connect_calls, 3);

                // The cycle repeats on the next health check rather than
                // giving up for good.
                poller.service(DueWork::HealthCheck).await;
                assert_eq!(poller.state(), LinkState::Polling);
            });

            assert_eq!(feed.state().borrow().connect_calls, 4);
            assert_eq!(
                link_transitions(&drain_events(&mut sub)),
                vec![
                    LinkState::Reconnecting,
                    LinkState::Disconnected,
                    LinkState::Reconnecting,
                    LinkState::Polling,
                ]
            );
        }

        #[test]
        fn test_full_queue_drops_new_but_acknowledges_everything() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue<2>> = RefCell::new(CommandQueue::new());
            let mut sub = MACRO_EVENT_CHANNEL.subscriber().unwrap();
            let mut poller = feed_poller(&feed, &queue);

            let mut ids = Vec::new();
            run_test(async {
                poller.connect().await;
                ids.push(feed.push("first"));
                ids.push(feed.push("second"));
                ids.push(feed.push("third"));
                poller.service(DueWork::Poll).await;
            });

            // The overflow item is gone from both sides: dropped locally,
            // acknowledged remotely, never redelivered.
            let mut pending = queue.borrow_mut();
            assert_eq!(pending.dequeue().unwrap().label.as_str(), "first");
            assert_eq!(pending.dequeue().unwrap().label.as_str(), "second");
            assert!(pending.is_empty());
            assert_eq!(feed.acks(), ids);
            assert_eq!(feed.pending_len(), 0);

            let events = drain_events(&mut sub);
            assert!(events.iter().any(|event| matches!(
                event,
                MacroEvent::QueueDrop { label } if label.as_str() == "third"
            )));
        }

        #[test]
        fn test_queue_capacity_backpressure() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut sub = MACRO_EVENT_CHANNEL.subscriber().unwrap();
            let mut poller = feed_poller(&feed, &queue);

            let mut ids = Vec::new();
            run_test(async {
                poller.connect().await;
                for i in 0..53 {
                    ids.push(feed.push(&format!("cmd{}", i)));
                }
                poller.service(DueWork::Poll).await;
            });

            // Fetched in batches until the feed runs dry; the first 50
            // fill the queue, the rest bounce but still get acknowledged.
            assert_eq!(queue.borrow().len(), 50);
            assert_eq!(feed.acks(), ids);
            assert_eq!(feed.pending_len(), 0);

            let events = drain_events(&mut sub);
            let drops: Vec<&str> = events
                .iter()
                .filter_map(|event| match event {
                    MacroEvent::QueueDrop { label } => Some(label.as_str()),
                    _ => None,
                })
                .collect();
            assert_eq!(drops, vec!["cmd50", "cmd51", "cmd52"]);

            let mut pending = queue.borrow_mut();
            for i in 0..50 {
                assert_eq!(pending.dequeue().unwrap().label.as_str(), format!("cmd{}", i));
            }
            assert!(pending.is_empty());
        }

        #[test]
        fn test_backlog_discarded_once_at_first_connect() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut poller = feed_poller(&feed, &queue);

            feed.push("stale1");
            feed.push("stale2");

            run_test(async {
                poller.connect().await;

                // The pre-connect backlog is acknowledged away unseen.
                assert!(queue.borrow().is_empty());
                assert_eq!(feed.acks().len(), 2);
                assert_eq!(feed.pending_len(), 0);

                // Anything arriving afterwards is fair game.
                feed.push("live");
                poller.service(DueWork::Poll).await;
            });

            assert_eq!(queue.borrow_mut().dequeue().unwrap().label.as_str(), "live");
            assert_eq!(feed.acks().len(), 3);
        }

        #[test]
        fn test_backlog_kept_when_drain_disabled() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let config = FeedConfig {
                drain_backlog_on_connect: false,
                ..FeedConfig::default()
            };
            let mut poller = FeedPoller::new(
                feed.clone(),
                &queue,
                config,
                MACRO_EVENT_CHANNEL.publisher().unwrap(),
            );

            feed.push("old");

            run_test(async {
                poller.connect().await;
                assert_eq!(feed.acks().len(), 0);

                poller.service(DueWork::Poll).await;
            });

            assert_eq!(queue.borrow_mut().dequeue().unwrap().label.as_str(), "old");
            assert_eq!(feed.acks().len(), 1);
        }

        #[test]
        fn test_fetch_timeout_reconnects_without_losing_items() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut poller = feed_poller(&feed, &queue);

            run_test(async {
                poller.connect().await;
                feed.push("keeper");
                feed.state().borrow_mut().hang_fetches = 1;

                let start = Instant::now();
                poller.service(DueWork::Poll).await;
                assert!(Instant::now() - start >= Duration::from_secs(10));
                assert_eq!(poller.state(), LinkState::Polling);

                // Nothing was handed out, so nothing was lost.
                assert!(queue.borrow().is_empty());
                assert_eq!(feed.acks().len(), 0);

                poller.service(DueWork::Poll).await;
            });

            assert_eq!(feed.state().borrow().connect_calls, 2);
            assert_eq!(queue.borrow_mut().dequeue().unwrap().label.as_str(), "keeper");
            assert_eq!(feed.acks().len(), 1);
        }

        #[test]
        fn test_fetch_error_reconnects() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut sub = MACRO_EVENT_CHANNEL.subscriber().unwrap();
            let mut poller = feed_poller(&feed, &queue);

            run_test(async {
                poller.connect().await;
                feed.state().borrow_mut().fail_fetches = 1;
                poller.service(DueWork::Poll).await;
            });

            assert_eq!(poller.state(), LinkState::Polling);
            assert_eq!(feed.state().borrow().connect_calls, 2);
            assert!(link_transitions(&drain_events(&mut sub)).contains(&LinkState::Reconnecting));
        }

        #[test]
        fn test_failed_acknowledge_aborts_batch_and_redelivers() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut poller = feed_poller(&feed, &queue);

            run_test(async {
                poller.connect().await;
                let first = feed.push("x");
                let second = feed.push("y");
                feed.state().borrow_mut().fail_acks = 1;

                poller.service(DueWork::Poll).await;

                // The batch stops at the failed acknowledge: x is queued
                // but still pending on the source, y untouched.
                assert_eq!(queue.borrow().len(), 1);
                assert_eq!(feed.acks().len(), 0);
                assert_eq!(feed.pending_len(), 2);
                assert_eq!(poller.state(), LinkState::Polling);

                // The next poll redelivers both; losing the never
                // acknowledged item would be worse than running it twice.
                poller.service(DueWork::Poll).await;
                assert_eq!(feed.acks(), vec![first, second]);
            });

            assert_eq!(queue.borrow().len(), 3);
            assert_eq!(feed.pending_len(), 0);
        }

        #[test]
        fn test_poll_skipped_while_disconnected() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut poller = feed_poller(&feed, &queue);

            feed.push("unreachable");
            run_test(poller.service(DueWork::Poll));

            assert_eq!(feed.state().borrow().fetch_calls, 0);
            assert!(queue.borrow().is_empty());
        }

        #[test]
        fn test_wait_due_cadence() {
            let feed = MockFeed::new();
            let queue: RefCell<CommandQueue> = RefCell::new(CommandQueue::new());
            let mut poller = feed_poller(&feed, &queue);

            let dues = run_test(async {
                let start = Instant::now();
                let mut dues = Vec::new();
                for _ in 0..16 {
                    let work = poller.wait_due().await;
                    dues.push((work, Instant::now() - start));
                }
                dues
            });

            // Polls every 2 s until the 30 s health check, which takes
            // priority over the poll due at the same instant.
            for i in 0..14 {
                assert_eq!(dues[i], (DueWork::Poll, Duration::from_secs(2 * (i as u64 + 1))));
            }
            assert_eq!(dues[14], (DueWork::HealthCheck, Duration::from_secs(30)));
            // The poll that lost the tie follows right behind, not a full
            // interval later.
            assert_eq!(dues[15].0, DueWork::Poll);
            assert!(dues[15].1 >= Duration::from_secs(30));
            assert!(dues[15].1 < Duration::from_secs(30) + Duration::from_millis(10));
        }

    }
}
