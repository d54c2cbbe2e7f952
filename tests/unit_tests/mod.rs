mod interaction;
mod mesh;
mod quadrature;
mod refinement;
mod settings;
