mod common;

use std::rc::Rc;

use common::{LoadCalls, MemoryStore, async_data_factory, init_tracing, object};
use pretty_assertions::assert_eq;
use serde_json::json;
use sluice::{Binder, Bootstrap, LoadStatus, RenderMode, bootstrap_all, render_mode};

#[tokio::test]
async fn bootstrap_preloads_data_before_first_render() {
	init_tracing();
	let _one_shot = render_mode::scoped(RenderMode::OneShot);
	let store = MemoryStore::new();
	let calls = LoadCalls::default();
	let binder = Binder::new(async_data_factory(&calls).render_mode_enabled(true));

	let walked = binder.instantiate(Rc::clone(&store), object(json!({"param": "y"})));
	assert_eq!(bootstrap_all([&walked]).await, 1);
	assert_eq!(store.dispatched(), 1);

	let rendered = binder.instantiate(Rc::clone(&store), object(json!({"param": "y"})));
	let props = rendered.props();
	assert_eq!(props.get("myAsyncData"), Some(&json!("more populated data")));
	assert_eq!(props.load_status.all, LoadStatus::Complete);
	assert_eq!(props.status("myAsyncData"), Some(LoadStatus::Complete));
	// once while walking, once in bootstrap, once for the render pass
	assert_eq!(calls.get(), 3);
}

#[tokio::test]
async fn bootstrap_skips_factories_not_enabled_for_render_mode() {
	init_tracing();
	let _one_shot = render_mode::scoped(RenderMode::OneShot);
	let store = MemoryStore::new();
	let calls = LoadCalls::default();
	let container = Binder::new(async_data_factory(&calls)).instantiate(Rc::clone(&store), object(json!({})));

	assert!(container.bootstrap().is_none());
	assert_eq!(bootstrap_all([&container]).await, 0);
	assert_eq!(calls.get(), 0);
	assert!(container.is_loading(None));
}

#[tokio::test]
async fn bootstrap_walks_mixed_components() {
	init_tracing();
	let _one_shot = render_mode::scoped(RenderMode::OneShot);
	let store = MemoryStore::new();
	let enabled = Binder::new(async_data_factory(&LoadCalls::default()).render_mode_enabled(true))
		.instantiate(Rc::clone(&store), object(json!({"param": "z"})));
	let skipped = Binder::new(async_data_factory(&LoadCalls::default())).instantiate(Rc::clone(&store), object(json!({})));

	let components: Vec<&dyn Bootstrap> = vec![&enabled, &skipped];
	assert_eq!(bootstrap_all(components).await, 1);
	assert_eq!(store.get_state_value("z"), Some(json!("more populated data")));
}
