//! ECS components for scene objects.
//!
//! A scene object is composed from these components instead of a class
//! hierarchy: every object has a [`SceneObject`](sceneobject::SceneObject)
//! id and a [`BodyRect`](bodyrect::BodyRect); physics, sprite, energy and
//! camera-follow are optional parts.
//!
//! Submodules overview:
//! - [`animation`] – clip definitions and per-entity playback cursor
//! - [`bodyrect`] – integer collision box in scene pixels
//! - [`camerafollow`] – makes the scene scroll follow an entity
//! - [`energy`] – clamped energy bar with depletion detection
//! - [`physics`] – held directions, momentum, gravity and motion state
//! - [`sceneobject`] – scene-local id, player marker, template name
//! - [`sprite`] – shared sprite sheet plus current animation mode

pub mod animation;
pub mod bodyrect;
pub mod camerafollow;
pub mod energy;
pub mod physics;
pub mod sceneobject;
pub mod sprite;
