pub mod dominant_color_analyzer;
