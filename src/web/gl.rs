// gl.rs - WebGL2 drawing of the gallery planes
//
// One program, one shared plane mesh, two textures per item. Textures
// start as the placeholder and are re-uploaded only when their slot is
// marked dirty by the scene.

use js_sys::{Float32Array, Uint16Array};
use web_sys::{
    HtmlImageElement, HtmlVideoElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::media::WebMedia;
use crate::error::{GalleryError, GalleryResult};
use crate::media::{TextureSource, VideoHandle};
use crate::render::{
    model_matrix, PlaneGeometry, FRAGMENT_SHADER, PLACEHOLDER_RGBA, PLACEHOLDER_SIZE, VERTEX_SHADER,
};
use crate::scene::GalleryScene;

fn compile_shader(gl: &GL, src: &str, kind: u32) -> GalleryResult<WebGlShader> {
    let shader = gl.create_shader(kind).ok_or_else(|| GalleryError::gl("could not create shader"))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl.get_shader_parameter(&shader, GL::COMPILE_STATUS).as_bool().unwrap_or(false) {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(GalleryError::gl(format!("shader compile: {info}")));
    }
    Ok(shader)
}

fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> GalleryResult<WebGlProgram> {
    let vert = compile_shader(gl, vert_src, GL::VERTEX_SHADER)?;
    let frag = compile_shader(gl, frag_src, GL::FRAGMENT_SHADER)?;
    let program = gl.create_program().ok_or_else(|| GalleryError::gl("could not create program"))?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    if !gl.get_program_parameter(&program, GL::LINK_STATUS).as_bool().unwrap_or(false) {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(GalleryError::gl(format!("program link: {info}")));
    }
    Ok(program)
}

fn placeholder_texture(gl: &GL) -> GalleryResult<WebGlTexture> {
    let tex = gl.create_texture().ok_or_else(|| GalleryError::gl("could not create texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&tex));
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        PLACEHOLDER_SIZE,
        PLACEHOLDER_SIZE,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&PLACEHOLDER_RGBA),
    )
    .map_err(|e| GalleryError::gl(format!("placeholder upload: {e:?}")))?;
    Ok(tex)
}

struct Uniforms {
    model_view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    plane_sizes: Option<WebGlUniformLocation>,
    image_sizes: Option<WebGlUniformLocation>,
    border_radius: Option<WebGlUniformLocation>,
    mix: Option<WebGlUniformLocation>,
}

struct PlaneTextures {
    primary: WebGlTexture,
    poster: WebGlTexture,
}

enum Upload {
    Primary(usize, TextureSource),
    Poster(usize),
}

pub struct GlRenderer {
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    index_count: i32,
    textures: Vec<PlaneTextures>,
    uniforms: Uniforms,
}

impl GlRenderer {
    pub fn new(gl: GL, mobile: bool, planes: usize) -> GalleryResult<Self> {
        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let geometry = PlaneGeometry::for_device(mobile);

        let vao = gl.create_vertex_array().ok_or_else(|| GalleryError::gl("could not create vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let mut buffers = Vec::with_capacity(3);
        for (name, data, size) in [("position", &geometry.positions, 3), ("uv", &geometry.uvs, 2)] {
            let buffer = gl.create_buffer().ok_or_else(|| GalleryError::gl("could not create buffer"))?;
            gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &Float32Array::from(data.as_slice()), GL::STATIC_DRAW);
            let loc = gl.get_attrib_location(&program, name);
            if loc >= 0 {
                gl.enable_vertex_attrib_array(loc as u32);
                gl.vertex_attrib_pointer_with_i32(loc as u32, size, GL::FLOAT, false, 0, 0);
            }
            buffers.push(buffer);
        }

        let index = gl.create_buffer().ok_or_else(|| GalleryError::gl("could not create buffer"))?;
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&index));
        gl.buffer_data_with_array_buffer_view(
            GL::ELEMENT_ARRAY_BUFFER,
            &Uint16Array::from(geometry.indices.as_slice()),
            GL::STATIC_DRAW,
        );
        buffers.push(index);
        gl.bind_vertex_array(None);

        gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
        let textures = (0..planes)
            .map(|_| -> GalleryResult<PlaneTextures> {
                Ok(PlaneTextures { primary: placeholder_texture(&gl)?, poster: placeholder_texture(&gl)? })
            })
            .collect::<GalleryResult<Vec<_>>>()?;

        gl.use_program(Some(&program));
        gl.uniform1i(gl.get_uniform_location(&program, "tMap").as_ref(), 0);
        gl.uniform1i(gl.get_uniform_location(&program, "tPoster").as_ref(), 1);
        let uniforms = Uniforms {
            model_view: gl.get_uniform_location(&program, "uModelView"),
            projection: gl.get_uniform_location(&program, "uProjection"),
            plane_sizes: gl.get_uniform_location(&program, "uPlaneSizes"),
            image_sizes: gl.get_uniform_location(&program, "uImageSizes"),
            border_radius: gl.get_uniform_location(&program, "uBorderRadius"),
            mix: gl.get_uniform_location(&program, "uMix"),
        };

        gl.disable(GL::DEPTH_TEST);
        gl.disable(GL::CULL_FACE);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        log::debug!("gl: {} planes, {} vertices each", planes, geometry.vertex_count());
        Ok(Self {
            gl,
            program,
            vao,
            buffers,
            index_count: geometry.indices.len() as i32,
            textures,
            uniforms,
        })
    }

    /// Drawing-buffer size in device pixels
    pub fn set_viewport(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    fn upload_video(&self, tex: &WebGlTexture, video: &HtmlVideoElement) -> GalleryResult<()> {
        self.gl.bind_texture(GL::TEXTURE_2D, Some(tex));
        self.gl
            .tex_image_2d_with_u32_and_u32_and_html_video_element(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                video,
            )
            .map_err(|e| GalleryError::gl(format!("video upload: {e:?}")))
    }

    fn upload_image(&self, tex: &WebGlTexture, image: &HtmlImageElement) -> GalleryResult<()> {
        self.gl.bind_texture(GL::TEXTURE_2D, Some(tex));
        self.gl
            .tex_image_2d_with_u32_and_u32_and_html_image_element(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                image,
            )
            .map_err(|e| GalleryError::gl(format!("image upload: {e:?}")))
    }

    fn upload_dirty(&self, scene: &mut GalleryScene<WebMedia>) {
        let mut uploads = Vec::new();
        for (i, item) in scene.items_mut().iter_mut().enumerate() {
            let source = item.primary().source();
            if item.primary_mut().take_dirty() {
                uploads.push(Upload::Primary(i, source));
            }
            if item.poster_mut().take_dirty() {
                uploads.push(Upload::Poster(i));
            }
        }

        for upload in uploads {
            let result = match upload {
                Upload::Primary(i, TextureSource::Video) => match scene.items()[i].video() {
                    Some(v) if v.has_current_data() => self.upload_video(&self.textures[i].primary, v.element()),
                    _ => Ok(()),
                },
                Upload::Primary(i, TextureSource::Image) => match scene.backend().image(i) {
                    Some(img) => self.upload_image(&self.textures[i].primary, img),
                    None => Ok(()),
                },
                Upload::Primary(_, TextureSource::Placeholder) => Ok(()),
                Upload::Poster(i) => match scene.backend().poster(i) {
                    Some(img) => self.upload_image(&self.textures[i].poster, img),
                    None => Ok(()),
                },
            };
            // a tainted or broken source leaves the previous texture in place
            if let Err(e) = result {
                log::warn!("{e}");
            }
        }
    }

    pub fn draw(&self, scene: &mut GalleryScene<WebMedia>) {
        self.upload_dirty(scene);

        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));

        let camera = scene.camera();
        let view = camera.view();
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.projection.as_ref(), false, &camera.projection().to_cols_array());
        gl.uniform1f(self.uniforms.border_radius.as_ref(), scene.border_radius());

        for (item, tex) in scene.items().iter().zip(&self.textures) {
            if !item.is_visible() {
                continue;
            }
            let plane = item.plane();
            let model_view = view * model_matrix(plane);
            gl.uniform_matrix4fv_with_f32_array(self.uniforms.model_view.as_ref(), false, &model_view.to_cols_array());
            gl.uniform2f(self.uniforms.plane_sizes.as_ref(), plane.scale_x, plane.scale_y);
            let [w, h] = item.image_size();
            gl.uniform2f(self.uniforms.image_sizes.as_ref(), w, h);
            gl.uniform1f(self.uniforms.mix.as_ref(), item.mix());

            gl.active_texture(GL::TEXTURE0);
            gl.bind_texture(GL::TEXTURE_2D, Some(&tex.primary));
            gl.active_texture(GL::TEXTURE1);
            gl.bind_texture(GL::TEXTURE_2D, Some(&tex.poster));
            gl.draw_elements_with_i32(GL::TRIANGLES, self.index_count, GL::UNSIGNED_SHORT, 0);
        }
        gl.bind_vertex_array(None);
    }

    /// Free every GL object this renderer created.
    pub fn teardown(&mut self) {
        let gl = &self.gl;
        for t in self.textures.drain(..) {
            gl.delete_texture(Some(&t.primary));
            gl.delete_texture(Some(&t.poster));
        }
        for b in self.buffers.drain(..) {
            gl.delete_buffer(Some(&b));
        }
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_program(Some(&self.program));
    }
}
