//! Rendu en arrière-plan : un seul rendu vivant à la fois.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use image::RgbaImage;

use crate::error::FractalError;
use crate::fractal::RenderParameters;
use crate::geometry::Camera;
use crate::render::raymarch::render_parallel;

/// Message envoyé par le thread de rendu.
#[derive(Debug)]
pub enum RenderMessage {
    /// Toutes les lignes sont calculées.
    Complete { image: RgbaImage, elapsed: Duration },
    /// Le rendu a été annulé ; l'image partielle reste exploitable.
    Cancelled { partial: RgbaImage },
}

/// Pilote les rendus lancés hors du thread appelant.
///
/// Lancer un rendu annule celui en cours avant tout échantillonnage avec la
/// nouvelle géométrie ; chaque rendu lit son propre instantané de caméra.
#[derive(Debug)]
pub struct RenderSession {
    cancel: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    receiver: Option<mpsc::Receiver<RenderMessage>>,
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSession {
    pub fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            handle: None,
            receiver: None,
        }
    }

    /// Valide la requête puis lance le rendu dans un thread séparé.
    ///
    /// Une configuration invalide est renvoyée immédiatement et le rendu
    /// précédent continue.
    pub fn start(
        &mut self,
        width: u32,
        height: u32,
        camera: &Camera,
        params: RenderParameters,
    ) -> Result<(), FractalError> {
        if width == 0 || height == 0 {
            return Err(FractalError::EmptyImage { width, height });
        }
        params.validate()?;

        // Annuler tout rendu en cours
        self.cancel.store(true, Ordering::Relaxed);
        self.cancel = Arc::new(AtomicBool::new(false));

        let (sender, receiver) = mpsc::channel();
        self.receiver = Some(receiver);

        let snapshot = camera.snapshot();
        let cancel = Arc::clone(&self.cancel);
        log::debug!(
            "lancement du rendu {}x{} ({}, puissance {})",
            width,
            height,
            params.set_family.name(),
            params.power
        );

        // L'ancien thread n'est pas joint : il voit son drapeau levé et s'arrête seul.
        self.handle = Some(thread::spawn(move || {
            let start = Instant::now();
            let image = match render_parallel(width, height, &snapshot, &params, &cancel) {
                Ok(image) => image,
                Err(e) => {
                    log::error!("rendu refusé après validation : {e}");
                    return;
                }
            };
            let message = if cancel.load(Ordering::Relaxed) {
                RenderMessage::Cancelled { partial: image }
            } else {
                RenderMessage::Complete { image, elapsed: start.elapsed() }
            };
            // Le récepteur a pu être remplacé par un rendu plus récent.
            let _ = sender.send(message);
        }));
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Drapeau du rendu courant, pour l'annuler depuis un autre thread.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_rendering(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Résultat du rendu courant s'il est disponible, sans bloquer.
    pub fn try_recv(&mut self) -> Option<RenderMessage> {
        let message = self.receiver.as_ref()?.try_recv().ok()?;
        self.finish();
        Some(message)
    }

    /// Attend la fin du rendu courant.
    pub fn wait(&mut self) -> Option<RenderMessage> {
        let message = self.receiver.as_ref()?.recv().ok();
        self.finish();
        message
    }

    fn finish(&mut self) {
        self.receiver = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("le thread de rendu a paniqué");
            }
        }
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}
