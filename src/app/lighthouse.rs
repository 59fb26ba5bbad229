use std::sync::Arc;

use glam::{EulerRot, Quat, Vec3};

use crate::animation::{AnimationAction, PlayDirection};
use crate::assets::{AssetServer, LoadState, ModelAsset, ModelHandle};
use crate::beam::{BeamMaterial, ConeMesh, ConeOptions, create_cone};
use crate::config::{ModelConfig, SceneConfig};
use crate::input::{ClickTargets, PointerEvent};
use crate::overlay::OverlayPanel;
use crate::scene::{Light, Node, NodeHandle, Scene};
use crate::surface::{OffscreenSurfaceBridge, RuntimeFactory, SurfaceMaterial, SurfaceTexture};
use crate::toggle::{ReversibleClipPlayer, SmoothedDriver, SpinWhileVisible, ToggleController, ToggleState};

/// The models the scene places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneModel {
    Lighthouse,
    Computer,
    SwitchBase,
    Knob,
}

impl SceneModel {
    pub const ALL: [SceneModel; 4] = [
        SceneModel::Lighthouse,
        SceneModel::Computer,
        SceneModel::SwitchBase,
        SceneModel::Knob,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SceneModel::Lighthouse => "Lighthouse",
            SceneModel::Computer => "Computer",
            SceneModel::SwitchBase => "SwitchBase",
            SceneModel::Knob => "Knob",
        }
    }

    fn config(self, config: &SceneConfig) -> &ModelConfig {
        match self {
            SceneModel::Lighthouse => &config.lighthouse,
            SceneModel::Computer => &config.computer,
            SceneModel::SwitchBase => &config.switch_base,
            SceneModel::Knob => &config.knob.model,
        }
    }
}

/// Where a model is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Placed,
    Failed,
}

/// What a click on a registered node means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Switch,
}

#[derive(Debug)]
struct ModelSlot {
    model: SceneModel,
    handle: ModelHandle,
    /// Posed group node the instance is parented to.
    group: NodeHandle,
    instance: Option<NodeHandle>,
    status: ModelStatus,
}

/// Root of the lighthouse scene.
///
/// Owns the switch state and everything that reads or writes it. The host
/// render loop calls [`frame`](Self::frame) once per frame, forwards resolved
/// clicks to [`click`](Self::click), and reads node transforms, the switch
/// light and the screen texture back out.
#[derive(Debug)]
pub struct LighthouseScene {
    config: SceneConfig,
    pub scene: Scene,
    assets: AssetServer,

    state: ToggleState,
    controller: ToggleController<ReversibleClipPlayer>,
    targets: ClickTargets<ClickTarget>,

    slots: Vec<ModelSlot>,

    switch_light: NodeHandle,
    light_driver: SmoothedDriver,

    cone: NodeHandle,
    cone_driver: SpinWhileVisible,
    cone_mesh: ConeMesh,
    cone_material: BeamMaterial,

    screen: NodeHandle,
    screen_material: SurfaceMaterial,
    bridge: OffscreenSurfaceBridge,
    overlay: OverlayPanel,

    mounted: bool,
}

impl LighthouseScene {
    /// Builds the scene and starts loading every model from
    /// `config.asset_root`.
    pub fn mount(config: SceneConfig, factory: Arc<dyn RuntimeFactory>) -> Self {
        let assets = AssetServer::new(&config.asset_root);
        Self::mount_with_assets(config, assets, factory)
    }

    /// Like [`mount`](Self::mount) but with a caller-provided asset server,
    /// which may already hold some of the models.
    pub fn mount_with_assets(
        config: SceneConfig,
        mut assets: AssetServer,
        factory: Arc<dyn RuntimeFactory>,
    ) -> Self {
        let mut scene = Scene::new();

        // Lighting
        let ambient = scene.create_node_with_name("AmbientLight");
        scene.set_light(
            ambient,
            Light::new_ambient(Vec3::ONE, config.lighting.ambient_intensity),
        );
        let sun = scene.create_node_with_name("DirectionalLight");
        if let Some(node) = scene.get_node_mut(sun) {
            node.transform.position = Vec3::from_array(config.lighting.directional_position);
        }
        scene.set_light(
            sun,
            Light::new_directional(Vec3::ONE, config.lighting.directional_intensity),
        );

        // Models
        let mut slots = Vec::with_capacity(SceneModel::ALL.len());
        for model in SceneModel::ALL {
            let model_config = model.config(&config);
            let group = scene.add_node(Node::with_transform(model_config.pose.transform()));
            scene.set_name(group, model.label());
            let handle = assets.load_model(&model_config.path);
            slots.push(ModelSlot {
                model,
                handle,
                group,
                instance: None,
                status: ModelStatus::Loading,
            });
        }

        let state = ToggleState::new(config.initial_on);

        let mut targets = ClickTargets::new();
        for slot in &slots {
            if matches!(slot.model, SceneModel::SwitchBase | SceneModel::Knob) {
                targets.register(slot.group, ClickTarget::Switch);
            }
        }

        // Switch light rides on the knob group.
        let knob_group = slots
            .iter()
            .find(|s| s.model == SceneModel::Knob)
            .map(|s| s.group);
        let light_config = config.switch_light;
        let light_driver = SmoothedDriver::new(
            light_config.peak_intensity,
            0.0,
            light_config.smoothing,
            if state.is_on() { light_config.peak_intensity } else { 0.0 },
        );
        let switch_light = scene.create_node_with_name("SwitchLight");
        if let Some(node) = scene.get_node_mut(switch_light) {
            node.transform.position = Vec3::from_array(light_config.offset);
        }
        scene.set_light(
            switch_light,
            Light::new_point(Vec3::from_array(light_config.color), light_driver.current(), 0.0),
        );
        if let Some(group) = knob_group {
            scene.attach(switch_light, group);
        }

        // Beam cone
        let cone = scene.add_node(Node::with_transform(config.cone.pose.transform()));
        scene.set_name(cone, "LightCone");
        let cone_driver = SpinWhileVisible::new(config.cone.spin_rate, 0.0);
        if let Some(node) = scene.get_node_mut(cone) {
            node.visible = state.is_on();
        }
        let cone_mesh = create_cone(&ConeOptions::from(&config.cone));
        let texture_path = assets.root().join(&config.cone.texture);
        let cone_material = BeamMaterial::load(&config.cone, &texture_path).unwrap_or_else(|err| {
            log::warn!("Beam cone drawn untextured: {err}");
            BeamMaterial::new(&config.cone)
        });

        // UI screen
        let screen = scene.add_node(Node::with_transform(config.screen.pose.transform()));
        scene.set_name(screen, "Screen");
        let bridge = OffscreenSurfaceBridge::mount(
            config.screen.source.clone(),
            factory,
            config.screen.surface.clone(),
        );
        let screen_material = SurfaceMaterial::with_map(bridge.texture());
        let overlay = OverlayPanel::from_config(&config.screen);

        scene.update_world_matrices();

        log::info!(
            "Lighthouse scene mounted (switch {})",
            if state.is_on() { "on" } else { "off" }
        );

        Self {
            config,
            scene,
            assets,
            state,
            controller: ToggleController::new(),
            targets,
            slots,
            switch_light,
            light_driver,
            cone,
            cone_driver,
            cone_mesh,
            cone_material,
            screen,
            screen_material,
            bridge,
            overlay,
            mounted: true,
        }
    }

    // ========================================================================
    // Assets
    // ========================================================================

    /// Places every model whose load finished since the last call. Returns
    /// how many models changed status.
    pub fn update_assets(&mut self) -> usize {
        self.assets.poll();

        let mut changed = 0;
        for i in 0..self.slots.len() {
            if self.slots[i].status != ModelStatus::Loading {
                continue;
            }
            let Some(state) = self.assets.state(self.slots[i].handle).cloned() else {
                continue;
            };
            match state {
                LoadState::Pending => {}
                LoadState::Ready(model) => {
                    let slot = &mut self.slots[i];
                    let instance = self.scene.instantiate(&model, &model.name);
                    self.scene.attach(instance, slot.group);
                    slot.instance = Some(instance);
                    slot.status = ModelStatus::Placed;
                    changed += 1;

                    log::debug!("Placed {} model '{}'", slot.model.label(), model.name);

                    if slot.model == SceneModel::Knob {
                        self.bind_knob(instance, &model);
                    }
                }
                LoadState::Failed(err) => {
                    let slot = &mut self.slots[i];
                    slot.status = ModelStatus::Failed;
                    changed += 1;
                    log::warn!("{} model unavailable: {err}", slot.model.label());
                }
            }
        }

        if changed > 0 {
            self.scene.update_world_matrices();
        }
        changed
    }

    fn bind_knob(&mut self, instance: NodeHandle, model: &ModelAsset) {
        let clip = self.config.knob.clip.as_deref();
        match ReversibleClipPlayer::bind(&self.scene, instance, model, clip) {
            Ok(mut player) => {
                // Only a scene mounted on starts at the end pose. Clicks made
                // while the knob was loading are not caught up.
                if self.config.initial_on && self.controller.activations() == 0 {
                    player.hold(PlayDirection::Forward);
                }
                self.controller.register_player(player);
            }
            Err(err) => log::warn!("Switch knob will not animate: {err}"),
        }
    }

    #[must_use]
    pub fn model_status(&self, model: SceneModel) -> ModelStatus {
        self.slot(model).map_or(ModelStatus::Failed, |s| s.status)
    }

    /// Posed group node of `model`. Present from mount on, before the model
    /// itself loads.
    #[must_use]
    pub fn model_group(&self, model: SceneModel) -> Option<NodeHandle> {
        self.slot(model).map(|s| s.group)
    }

    /// Root of the placed model instance.
    #[must_use]
    pub fn model_instance(&self, model: SceneModel) -> Option<NodeHandle> {
        self.slot(model).and_then(|s| s.instance)
    }

    fn slot(&self, model: SceneModel) -> Option<&ModelSlot> {
        self.slots.iter().find(|s| s.model == model)
    }

    #[must_use]
    pub fn assets(&self) -> &AssetServer {
        &self.assets
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Dispatches a resolved pointer click. Returns the number of handlers
    /// that ran; always 0 once unmounted.
    pub fn click(&mut self, mut event: PointerEvent) -> usize {
        if !self.mounted {
            return 0;
        }

        let Self {
            scene,
            targets,
            controller,
            state,
            ..
        } = self;

        targets.dispatch(scene, &mut event, |target, event| match target {
            ClickTarget::Switch => {
                controller.handle_activate(event, state);
            }
        })
    }

    /// Clicks the switch as if its knob were hit.
    pub fn click_switch(&mut self) -> usize {
        let hit = self
            .model_instance(SceneModel::Knob)
            .or_else(|| self.model_group(SceneModel::Knob));
        match hit {
            Some(node) => self.click(PointerEvent::new([node])),
            None => 0,
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Advances one frame: clip playback, switch light, cone, screen runtime,
    /// then world matrices.
    pub fn frame(&mut self, dt: f32) {
        if !self.mounted {
            return;
        }

        if let Some(player) = self.controller.player_mut() {
            player.advance(dt, &mut self.scene);
        }

        let intensity = self.light_driver.step(self.state);
        if let Some(light) = self.scene.get_light_mut(self.switch_light) {
            light.intensity = intensity;
        }

        let (visible, angle) = self.cone_driver.step(self.state);
        let [x, y, z] = self.config.cone.pose.rotation;
        if let Some(node) = self.scene.get_node_mut(self.cone) {
            node.visible = visible;
            node.transform.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z + angle);
        }

        self.bridge.advance(dt);

        self.scene.update_world_matrices();
    }

    // ========================================================================
    // State
    // ========================================================================

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    #[must_use]
    pub fn state(&self) -> ToggleState {
        self.state
    }

    #[must_use]
    pub fn controller(&self) -> &ToggleController<ReversibleClipPlayer> {
        &self.controller
    }

    /// Playback state of the knob clip, once the knob is bound.
    #[must_use]
    pub fn switch_action(&self) -> Option<&AnimationAction> {
        self.controller.player().and_then(ReversibleClipPlayer::action)
    }

    #[must_use]
    pub fn light_intensity(&self) -> f32 {
        self.scene
            .get_light(self.switch_light)
            .map_or(0.0, |l| l.intensity)
    }

    #[must_use]
    pub fn switch_light(&self) -> NodeHandle {
        self.switch_light
    }

    #[must_use]
    pub fn cone(&self) -> NodeHandle {
        self.cone
    }

    #[must_use]
    pub fn cone_visible(&self) -> bool {
        self.scene.is_visible(self.cone)
    }

    #[must_use]
    pub fn cone_angle(&self) -> f32 {
        self.cone_driver.angle()
    }

    #[must_use]
    pub fn cone_mesh(&self) -> &ConeMesh {
        &self.cone_mesh
    }

    #[must_use]
    pub fn cone_material(&self) -> &BeamMaterial {
        &self.cone_material
    }

    // ========================================================================
    // Screen
    // ========================================================================

    #[must_use]
    pub fn screen(&self) -> NodeHandle {
        self.screen
    }

    #[must_use]
    pub fn screen_material(&self) -> &SurfaceMaterial {
        &self.screen_material
    }

    #[must_use]
    pub fn screen_texture(&self) -> Option<SurfaceTexture> {
        self.bridge.texture()
    }

    #[must_use]
    pub fn bridge(&self) -> &OffscreenSurfaceBridge {
        &self.bridge
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayPanel {
        &self.overlay
    }

    /// Swaps the animation shown on the screen and rebinds the material to
    /// the new surface.
    pub fn set_screen_source(&mut self, source: impl Into<String>) {
        self.bridge.set_source(source);
        self.screen_material.map = self.bridge.texture();
    }

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Stops the screen runtime and drops the switch player. Frames after
    /// this are no-ops. Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.bridge.unmount();
        self.screen_material.map = None;
        self.controller.unregister_player();
        log::info!("Lighthouse scene unmounted");
    }
}
