use std::sync::Arc;

use level_content::builtin_catalogue;
use level_core::{GenerationConfig, NodeId};
use level_runtime::{
    Event, EventBus, InMemoryProducer, Level, LevelEvent, NoOccupants, RecordingRelocator,
    RoomEvent, RuntimeConfig, RuntimeError, Topic,
};

struct Session {
    level: Level,
    producer: Arc<InMemoryProducer>,
    relocator: Arc<RecordingRelocator>,
    bus: EventBus,
}

fn session(seed: u64) -> Session {
    let producer = Arc::new(InMemoryProducer::new());
    let relocator = Arc::new(RecordingRelocator::new());
    let bus = EventBus::new();

    let level = Level::builder()
        .generation(GenerationConfig::default().with_room_range(4, 6))
        .catalogue(builtin_catalogue())
        .seed(seed)
        .shared_producer(producer.clone())
        .shared_relocator(relocator.clone())
        .events(bus.clone())
        .build()
        .expect("level should build");

    Session {
        level,
        producer,
        relocator,
        bus,
    }
}

/// Clears the current room and walks through the door leading to `next`.
async fn step(level: &mut Level, next: NodeId) -> Result<(), RuntimeError> {
    let runtime = level.runtime_mut();
    let current = runtime.current().expect("a room is active");
    let door = runtime
        .graph()
        .outgoing(current)
        .find(|edge| edge.to() == next)
        .map(|edge| edge.id())
        .expect("path follows doors");

    runtime.notify_encounter_cleared()?;
    runtime.request_transition(next, door).await
}

#[tokio::test]
async fn walking_the_shortest_path_wins_the_level() {
    let bus = EventBus::new();
    let mut level_events = bus.subscribe(Topic::Level);
    let producer = Arc::new(InMemoryProducer::new());

    let mut level = Level::builder()
        .catalogue(builtin_catalogue())
        .seed(42)
        .shared_producer(producer.clone())
        .relocator(RecordingRelocator::new())
        .events(bus.clone())
        .build()
        .expect("level should build");

    match level_events.try_recv().expect("generation is announced") {
        Event::Level(LevelEvent::Generated { seed, rooms, .. }) => {
            assert_eq!(seed, 42);
            assert_eq!(rooms, level.graph().node_count());
        }
        other => panic!("unexpected event: {other:?}"),
    }

    level.start().await.expect("start room loads");
    let start = level.graph().start().unwrap();
    let boss = level.graph().boss().unwrap();
    let path = level.graph().shortest_path_to_boss(start);
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&boss));

    for &next in &path[1..] {
        step(&mut level, next).await.expect("transition succeeds");
        assert_eq!(level.runtime().current(), Some(next));

        let active: Vec<_> = level
            .runtime()
            .loader()
            .loaded_nodes()
            .into_iter()
            .filter_map(|node| level.runtime().loader().get_loaded(node))
            .filter(|room| room.active)
            .map(|room| room.node)
            .collect();
        assert_eq!(active, vec![next], "exactly one room is active");
    }

    level
        .runtime_mut()
        .notify_encounter_cleared()
        .expect("boss encounter clears");
    assert_eq!(
        level_events.try_recv().unwrap(),
        Event::Level(LevelEvent::Won { boss })
    );

    level.teardown().await.expect("teardown succeeds");
    assert_eq!(producer.live_count(), 0);
}

#[tokio::test]
async fn transitions_relocate_occupants_to_each_room() {
    let mut s = session(7);
    let mut room_events = s.bus.subscribe(Topic::Room);
    s.level.start().await.unwrap();

    let start = s.level.graph().start().unwrap();
    let path = s.level.graph().shortest_path_to_boss(start);
    for &next in &path[1..] {
        step(&mut s.level, next).await.unwrap();
    }

    let anchors: Vec<NodeId> = s.relocator.anchors().iter().map(|anchor| anchor.node).collect();
    assert_eq!(anchors, path[1..].to_vec());

    let transitions = std::iter::from_fn(|| room_events.try_recv().ok())
        .filter(|event| matches!(event, Event::Room(RoomEvent::TransitionCompleted { .. })))
        .count();
    assert_eq!(transitions, path.len() - 1);
}

#[tokio::test]
async fn distant_rooms_are_evicted_while_walking() {
    let mut s = session(3);
    let config = RuntimeConfig::default();
    s.level.start().await.unwrap();
    s.level.runtime().loader().wait_idle().await.unwrap();

    let start = s.level.graph().start().unwrap();
    let path = s.level.graph().shortest_path_to_boss(start);
    let mut previous = start;
    for &next in &path[1..] {
        step(&mut s.level, next).await.unwrap();
        s.level.runtime().loader().wait_idle().await.unwrap();

        let graph = s.level.graph();
        let origin = graph.node(next).unwrap().grid();
        // Preloads for the new room are queued after eviction.
        let preloaded: Vec<NodeId> = graph
            .nodes_within(next, config.preload_distance)
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        for node in s.level.runtime().loader().loaded_nodes() {
            let distance = graph.node(node).unwrap().grid().manhattan(origin);
            assert!(
                distance <= config.evict_distance || node == previous || preloaded.contains(&node),
                "{node} left loaded {distance} cells away"
            );
        }
        previous = next;
    }

    assert_eq!(
        s.producer.live_count(),
        s.level.runtime().loader().loaded_nodes().len()
    );
}

#[test]
fn building_without_collaborators_fails() {
    let missing_producer = Level::builder()
        .catalogue(builtin_catalogue())
        .relocator(RecordingRelocator::new())
        .build();
    assert!(matches!(
        missing_producer,
        Err(RuntimeError::MissingCollaborator("content producer"))
    ));

    let missing_catalogue = Level::builder()
        .producer(InMemoryProducer::new())
        .relocator(RecordingRelocator::new())
        .build();
    assert!(matches!(
        missing_catalogue,
        Err(RuntimeError::MissingCollaborator("archetype catalogue"))
    ));
}

#[test]
fn generation_errors_surface_from_build() {
    let result = Level::builder()
        .generation(GenerationConfig::default().with_room_range(5, 2))
        .catalogue(builtin_catalogue())
        .producer(InMemoryProducer::new())
        .relocator(NoOccupants)
        .build();
    assert!(matches!(result, Err(RuntimeError::Generation(_))));
}

#[test]
fn same_seed_builds_the_same_level() {
    let a = session(11);
    let b = session(11);

    let rooms = |s: &Session| -> Vec<(NodeId, String)> {
        s.level
            .graph()
            .nodes()
            .map(|node| (node.id(), node.archetype().name.clone()))
            .collect()
    };
    assert_eq!(rooms(&a), rooms(&b));
    assert_eq!(a.level.seed(), 11);
}
