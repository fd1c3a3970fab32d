// End-to-end lasso flow: pointer events -> polygon -> mask -> store -> category
use scatter_lasso::commit::read_coded_values;
use scatter_lasso::store::change_event;
use scatter_lasso::{
    CameraProjector, Category, CommitError, CommitProtocol, CommitStatus, InputMode, InteractionMode, InteractionState,
    MaskTransport, MemoryStore, Operation, PointerInfo, Polygon, ReactiveStore, StoreValue, ViewerConfig,
};
use std::cell::RefCell;
use std::rc::Rc;

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 200.0;

    fn at(x: f32, y: f32) -> PointerInfo {
        PointerInfo::from_surface(x, y, SIZE, SIZE)
    }

    /// Draw the NDC triangle (-1,-1), (1,-1), (0,1) on a 200x200 surface
    fn draw_triangle(state: &mut InteractionState, operation: Operation) -> Polygon {
        state.set_mode(InteractionMode::Lasso { operation });
        state.pointer_down(&at(0.0, SIZE));
        state.pointer_move(&at(0.5, SIZE)); // under the spacing threshold, dropped
        state.pointer_move(&at(SIZE, SIZE));
        state.pointer_move(&at(SIZE / 2.0, 0.0));
        state.pointer_up();
        assert_eq!(state.lasso().points().len(), 3);
        state.commit().expect("three points make a polygon")
    }

    fn scenario_points() -> Vec<[f32; 3]> {
        vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [-0.9, -0.9, 0.0], [5.0, 5.0, 2.0], [0.1, -0.1, 0.0]]
    }

    fn setup(config: &ViewerConfig) -> (MemoryStore, Category) {
        let mut store = MemoryStore::new();
        let category = Category::new(
            "country",
            &[None, None, None, None, None],
            Some(vec!["Italy".to_string(), "Spain".to_string()]),
        )
        .unwrap();
        category.sync_to_store(&mut store, &config.keys);
        (store, category)
    }

    #[test]
    fn test_add_round_trip_through_store() {
        let config = ViewerConfig::default();
        let (mut store, mut category) = setup(&config);

        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);
        store.subscribe(
            &change_event(&config.keys.lasso_result),
            Box::new(move |value: &StoreValue| sink.borrow_mut().push(value.clone())),
        );

        let mut interaction = InteractionState::with_min_spacing(config.min_lasso_spacing_px);
        let mut protocol = CommitProtocol::new(&config);
        let polygon = draw_triangle(&mut interaction, Operation::Add);

        let prepared = protocol
            .prepare_commit(polygon, &scenario_points(), &CameraProjector::default(), Operation::Add, "Spain")
            .unwrap();
        assert_eq!(prepared.mask.iter_selected().collect::<Vec<_>>(), vec![0, 2, 4]);

        let receipt = protocol.submit(&mut store, prepared).unwrap();
        assert_eq!(receipt.request_id, 1);
        assert_eq!(receipt.num_changed, 3);

        let result = category.respond_to_store(&mut store, &config.keys, InputMode::Strict).unwrap();
        assert_eq!(results.borrow().len(), 1);
        assert_eq!(result.status, CommitStatus::Ok { num_selected: 3, num_changed: 3 });

        let observed = protocol.read_result(&store).unwrap().unwrap();
        assert!(protocol.on_commit_result(&observed).is_ok());
        assert_eq!(protocol.pending().count(), 0);

        assert_eq!(category.coded_values(), &[2, 0, 2, 0, 2]);
        assert_eq!(
            read_coded_values(&store, &config.keys.coded_values, InputMode::Strict).unwrap(),
            vec![2, 0, 2, 0, 2]
        );
    }

    #[test]
    fn test_add_then_remove_nets_to_unassigned() {
        let config = ViewerConfig {
            mask_transport: MaskTransport::Base64,
            ..ViewerConfig::default()
        };
        let (mut store, mut category) = setup(&config);
        let mut interaction = InteractionState::new();
        let mut protocol = CommitProtocol::new(&config);
        let projector = CameraProjector::default();

        for (operation, expected_id) in [(Operation::Add, 1), (Operation::Remove, 2)] {
            let polygon = draw_triangle(&mut interaction, operation);
            let prepared = protocol
                .prepare_commit(polygon, &scenario_points(), &projector, operation, "Italy")
                .unwrap();
            assert_eq!(prepared.request_id, expected_id);
            protocol.submit(&mut store, prepared).unwrap();
            assert!(matches!(store.get(&config.keys.lasso_mask), Some(StoreValue::Json(_))));

            let result = category.respond_to_store(&mut store, &config.keys, config.input_mode).unwrap();
            assert!(result.is_ok());
            protocol.on_commit_result(&result).unwrap();
        }

        assert_eq!(category.coded_values(), &[0; 5]);
        assert_eq!(category.num_unassigned(), 5);
    }

    #[test]
    fn test_store_rejection_is_reported_without_rollback() {
        let config = ViewerConfig::default();
        let (mut store, _) = setup(&config);
        // the store side knows fewer points than the viewer
        let mut short = Category::new("country", &[None, None], Some(vec!["Italy".to_string(), "Spain".to_string()]))
            .unwrap();

        let mut interaction = InteractionState::new();
        let mut protocol = CommitProtocol::new(&config);
        let polygon = draw_triangle(&mut interaction, Operation::Add);
        let prepared = protocol
            .prepare_commit(polygon, &scenario_points(), &CameraProjector::default(), Operation::Add, "Spain")
            .unwrap();
        protocol.submit(&mut store, prepared).unwrap();

        // two points need one byte, the mask has one: accepted and truncated
        let result = short.respond_to_store(&mut store, &config.keys, InputMode::Strict).unwrap();
        assert!(result.is_ok());

        store.set_remote(&config.keys.lasso_mask, StoreValue::Bytes(Vec::new()));
        let mut full = Category::new("country", &[None; 5], Some(vec!["Spain".to_string()])).unwrap();
        let rejected = full.respond_to_store(&mut store, &config.keys, InputMode::Strict).unwrap();
        assert!(!rejected.is_ok());
        assert_eq!(full.coded_values(), &[0; 5]);

        assert!(matches!(
            protocol.on_commit_result(&rejected),
            Err(CommitError::StoreMutationError { request_id: 1, .. })
        ));
        // later commits are not blocked
        let polygon = draw_triangle(&mut interaction, Operation::Add);
        let next = protocol
            .prepare_commit(polygon, &scenario_points(), &CameraProjector::default(), Operation::Add, "Spain")
            .unwrap();
        assert_eq!(next.request_id, 2);
    }

    #[test]
    fn test_cancel_discards_lasso() {
        let mut interaction = InteractionState::new();
        interaction.set_mode(InteractionMode::Lasso { operation: Operation::Add });
        interaction.pointer_down(&at(10.0, 10.0));
        interaction.pointer_move(&at(50.0, 10.0));
        interaction.cancel();
        assert!(interaction.commit().is_none());
        assert!(interaction.overlay_path().is_none());
    }
}
