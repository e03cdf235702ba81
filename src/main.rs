//! Chompo entry point
//!
//! Builds the DOM, wires pointer events and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent};

    use chompo::consts::*;
    use chompo::gaze::EyeSide;
    use chompo::sim::{ChompoLayout, FoodKind, FrameClock, Scene, SceneEvent};
    use chompo::view::Frame;
    use chompo::{Settings, Viewport};

    /// App instance holding all state
    struct App {
        scene: Scene,
        clock: FrameClock,
        /// Food sprites currently in the DOM, by food id
        sprites: HashMap<u32, HtmlElement>,
        dom: Dom,
    }

    /// Elements updated every frame
    struct Dom {
        document: Document,
        food_layer: HtmlElement,
        chompo: HtmlElement,
        left_pupil: HtmlElement,
        right_pupil: HtmlElement,
        ghost: HtmlElement,
        counter: Option<Element>,
    }

    impl App {
        fn step_frame(&mut self, time: f64) {
            let steps = self.clock.tick(time);
            for _ in 0..steps {
                self.scene.step(SIM_DT);
            }

            for event in self.scene.take_events() {
                match event {
                    SceneEvent::Eaten { id, .. } | SceneEvent::Evicted { id } => {
                        if let Some(el) = self.sprites.remove(&id) {
                            el.remove();
                        }
                    }
                    SceneEvent::Cleared { .. } => {
                        for (_, el) in self.sprites.drain() {
                            el.remove();
                        }
                    }
                    SceneEvent::Spawned { .. } => {}
                }
            }

            self.render();
        }

        /// Push the current frame into the DOM
        fn render(&mut self) {
            let frame = Frame::capture(&self.scene);

            set_transform(&self.dom.left_pupil, &frame.pupil_transform(EyeSide::Left));
            set_transform(&self.dom.right_pupil, &frame.pupil_transform(EyeSide::Right));
            set_transform(&self.dom.chompo, &frame.chompo_transform());

            for sprite in &frame.sprites {
                let el = match self.sprites.get(&sprite.id).cloned() {
                    Some(el) => el,
                    None => match self.dom.create_sprite(sprite.id, sprite.kind, sprite.size) {
                        Some(el) => {
                            self.sprites.insert(sprite.id, el.clone());
                            el
                        }
                        None => continue,
                    },
                };
                set_transform(&el, &sprite.css_transform());
                let _ = el
                    .class_list()
                    .toggle_with_force("held", frame.held == Some(sprite.id));
            }

            match frame.ghost {
                Some(ghost) => {
                    self.dom.ghost.set_text_content(Some(ghost.kind.template().glyph));
                    let _ = self.dom.ghost.style().set_property("width", &px(ghost.size.x));
                    let _ = self.dom.ghost.style().set_property("height", &px(ghost.size.y));
                    set_transform(&self.dom.ghost, &ghost.css_transform());
                    let _ = self.dom.ghost.class_list().remove_1("hidden");
                }
                None => {
                    let _ = self.dom.ghost.class_list().add_1("hidden");
                }
            }

            if let Some(counter) = &self.dom.counter {
                counter.set_text_content(Some(&frame.eaten.to_string()));
            }
        }
    }

    impl Dom {
        fn create_sprite(&self, id: u32, kind: FoodKind, size: Vec2) -> Option<HtmlElement> {
            let el: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
            el.set_class_name("food");
            let _ = el.set_attribute("data-food-id", &id.to_string());
            el.set_text_content(Some(kind.template().glyph));
            let style = el.style();
            let _ = style.set_property("width", &px(size.x));
            let _ = style.set_property("height", &px(size.y));
            let _ = style.set_property("font-size", &px(size.y.min(size.x)));
            let _ = self.food_layer.append_child(&el);
            Some(el)
        }
    }

    fn px(v: f32) -> String {
        format!("{:.0}px", v)
    }

    fn set_transform(el: &HtmlElement, transform: &str) {
        let _ = el.style().set_property("transform", transform);
    }

    fn viewport() -> Viewport {
        let window = web_sys::window().expect("no window");
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1280.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(720.0);
        Viewport::new(w as f32, h as f32)
    }

    fn pointer_of(event: &MouseEvent) -> Vec2 {
        Vec2::new(event.client_x() as f32, event.client_y() as f32)
    }

    fn div(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.set_class_name(class);
        Ok(el)
    }

    /// Build Chompo, the palette and the food layer under `#app`
    fn build_dom(document: &Document, settings: &Settings) -> Result<Dom, JsValue> {
        let root = document
            .get_element_by_id("app")
            .or_else(|| document.body().map(Element::from))
            .ok_or_else(|| JsValue::from_str("no #app or body"))?;

        let food_layer = div(document, "food-layer")?;
        root.append_child(&food_layer)?;

        let palette = div(document, "palette")?;
        for kind in &settings.palette {
            let item = div(document, "palette-item")?;
            item.set_attribute("data-food-kind", kind.as_str())?;
            item.set_attribute("title", kind.as_str())?;
            item.set_text_content(Some(kind.template().glyph));
            palette.append_child(&item)?;
        }
        root.append_child(&palette)?;

        // Chompo sprite, anchored bottom centre
        let chompo = div(document, "chompo")?;
        chompo.style().set_property("width", &px(CHOMPO_SIZE))?;
        chompo.style().set_property("height", &px(CHOMPO_SIZE))?;
        chompo.append_child(&div(document, "chompo-body")?)?;

        let (mx, my, mw, mh) = MOUTH_RECT;
        let mouth = div(document, "mouth")?;
        let style = mouth.style();
        style.set_property("left", &px(mx))?;
        style.set_property("top", &px(my))?;
        style.set_property("width", &px(mw))?;
        style.set_property("height", &px(mh))?;
        chompo.append_child(&mouth)?;

        let rest = ChompoLayout::pupil_rest();
        let mut pupils = Vec::with_capacity(2);
        for (side, (x, y)) in [(EyeSide::Left, LEFT_SOCKET_ORIGIN), (EyeSide::Right, RIGHT_SOCKET_ORIGIN)] {
            let socket = div(document, "eye-socket")?;
            let style = socket.style();
            style.set_property("left", &px(x))?;
            style.set_property("top", &px(y))?;
            style.set_property("width", &px(EYE_SOCKET_SIZE))?;
            style.set_property("height", &px(EYE_SOCKET_SIZE))?;

            let pupil = div(document, "pupil")?;
            pupil.set_attribute("data-eye", side.as_str())?;
            pupil.style().set_property("left", &px(rest.x))?;
            pupil.style().set_property("top", &px(rest.y))?;
            pupil.style().set_property("width", &px(PUPIL_SIZE))?;
            pupil.style().set_property("height", &px(PUPIL_SIZE))?;
            socket.append_child(&pupil)?;
            chompo.append_child(&socket)?;
            pupils.push(pupil);
        }
        root.append_child(&chompo)?;

        let ghost = div(document, "food ghost hidden")?;
        root.append_child(&ghost)?;

        let right_pupil = pupils.pop().ok_or_else(|| JsValue::from_str("missing pupil"))?;
        let left_pupil = pupils.pop().ok_or_else(|| JsValue::from_str("missing pupil"))?;

        Ok(Dom {
            document: document.clone(),
            food_layer,
            chompo,
            left_pupil,
            right_pupil,
            ghost,
            counter: document.get_element_by_id("eaten-count"),
        })
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Chompo waking up...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

        let settings = Settings::load();
        let dom = build_dom(&document, &settings)?;

        let seed = js_sys::Date::now() as u64;
        let scene = Scene::new(settings, viewport(), seed);
        let app = Rc::new(RefCell::new(App {
            scene,
            clock: FrameClock::new(),
            sprites: HashMap::new(),
            dom,
        }));

        log::info!("Scene initialized with seed: {}", seed);

        setup_input_handlers(&window, app.clone())?;
        request_animation_frame(app);

        log::info!("Chompo is hungry!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Pointer move - eyes follow, drags follow
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().scene.pointer_move(pointer_of(&event));
            });
            window.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer down - pick a template from the palette or grab a food
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                let pointer = pointer_of(&event);
                let mut a = app.borrow_mut();

                if let Some(item) = target.closest("[data-food-kind]").ok().flatten() {
                    let kind = item
                        .get_attribute("data-food-kind")
                        .and_then(|k| FoodKind::from_str(&k));
                    if let Some(kind) = kind {
                        event.prevent_default();
                        a.scene.grab_template(kind, pointer);
                    }
                } else if let Some(item) = target.closest("[data-food-id]").ok().flatten() {
                    let id = item
                        .get_attribute("data-food-id")
                        .and_then(|id| id.parse::<u32>().ok());
                    if let Some(id) = id {
                        event.prevent_default();
                        if !a.scene.grab_food(id, pointer) {
                            log::debug!("Food {} vanished before it could be grabbed", id);
                        }
                    }
                }
            });
            window.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer up - drop whatever is being dragged
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().scene.pointer_up(pointer_of(&event));
            });
            window.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
            // Touch scrolls and lost captures end the drag too
            window.add_event_listener_with_callback("pointercancel", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Resize - move Chompo, the walls and (optionally) the eye sockets
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().scene.resize(viewport());
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Tab hidden - don't replay the missed time when it comes back
        {
            let app = app.clone();
            let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().clock.reset();
            });
            document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let "c" | "C" = event.key().as_str() {
                    app.borrow_mut().scene.clear_food();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().step_frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Chompo (native) starting...");
    log::info!("The DOM front end is web-only - run with `trunk serve`; running a headless demo");

    demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drop a few foods, wave the pointer around and report what happened
#[cfg(not(target_arch = "wasm32"))]
fn demo() {
    use chompo::consts::SIM_DT;
    use chompo::sim::{FoodKind, Scene, SceneEvent};
    use chompo::{Settings, Viewport};
    use glam::Vec2;

    let viewport = Viewport::new(800.0, 600.0);
    let mut scene = Scene::new(Settings::load(), viewport, 2024);

    for pointer in [Vec2::new(0.0, 0.0), Vec2::new(400.0, 454.0), Vec2::new(800.0, 300.0)] {
        scene.pointer_move(pointer);
        let offsets = scene.pupil_offsets();
        println!(
            "pointer ({:>5.1}, {:>5.1}) -> left ({:>6.2}, {:>6.2}) right ({:>6.2}, {:>6.2})",
            pointer.x, pointer.y, offsets.left.x, offsets.left.y, offsets.right.x, offsets.right.y
        );
    }

    let mouth = scene.layout().mouth;
    let above_mouth = Vec2::new(mouth.center().x, mouth.top - 80.0);
    scene.grab_template(FoodKind::Cookie, Vec2::new(30.0, 30.0));
    scene.pointer_move(above_mouth);
    scene.pointer_up(above_mouth);
    scene.spawn(FoodKind::Toast, Vec2::new(120.0, 100.0));

    // Two simulated seconds
    for _ in 0..(2.0 / SIM_DT) as usize {
        scene.step(SIM_DT);
    }

    for event in scene.take_events() {
        match event {
            SceneEvent::Spawned { id, kind } => println!("spawned {} #{}", kind.as_str(), id),
            SceneEvent::Eaten { id, kind } => println!("ate {} #{}", kind.as_str(), id),
            SceneEvent::Evicted { id } => println!("evicted #{}", id),
            SceneEvent::Cleared { count } => println!("cleared {}", count),
        }
    }
    println!("eaten: {}, left on the floor: {}", scene.eaten_count(), scene.foods().len());
}
